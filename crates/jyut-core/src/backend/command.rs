use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug_span;

use super::{BackendError, Transliterator};

const SCHEME_PLACEHOLDER: &str = "{scheme}";

/// Runs an external lookup program once per batch.
///
/// Inputs are written one per line to the child's stdin; the child must
/// answer with exactly one line per input on stdout, in order.
pub struct CommandTransliterator {
    argv: Vec<String>,
}

impl CommandTransliterator {
    pub fn new(argv: Vec<String>) -> Result<Self, BackendError> {
        if argv.is_empty() {
            return Err(BackendError::Protocol("empty lookup command".to_string()));
        }
        Ok(Self { argv })
    }

    fn command_for(&self, scheme: &str) -> Command {
        let mut args = self
            .argv
            .iter()
            .map(|a| a.replace(SCHEME_PLACEHOLDER, scheme));
        // argv is non-empty (checked in new)
        let program = args.next().unwrap_or_default();
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    }
}

impl Transliterator for CommandTransliterator {
    fn transliterate(&self, scheme: &str, text: &str) -> Result<String, BackendError> {
        let mut out = self.transliterate_batch(scheme, &[text.to_string()])?;
        out.pop()
            .ok_or_else(|| BackendError::Protocol("no output line".to_string()))
    }

    fn transliterate_batch(
        &self,
        scheme: &str,
        texts: &[String],
    ) -> Result<Vec<String>, BackendError> {
        let _span = debug_span!("command_batch", scheme, count = texts.len()).entered();
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut child = self
            .command_for(scheme)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut input = String::new();
        for text in texts {
            input.push_str(&text.replace(['\r', '\n'], " "));
            input.push('\n');
        }
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::Protocol("child stdin unavailable".to_string()))?;
        // Feed stdin from a helper thread so a chatty child cannot fill its
        // stdout pipe while we are still writing.
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        // stderr is drained concurrently too, or a noisy child blocks on it
        // while we wait for stdout to close.
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| BackendError::Protocol("child stderr unavailable".to_string()))?;
        let diagnostics = thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).map(|_| buf)
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BackendError::Protocol("child stdout unavailable".to_string()))?;
        let lines: Vec<String> = BufReader::new(stdout).lines().collect::<Result<_, _>>()?;

        writer
            .join()
            .map_err(|_| BackendError::Protocol("stdin writer panicked".to_string()))??;
        let stderr = diagnostics
            .join()
            .map_err(|_| BackendError::Protocol("stderr reader panicked".to_string()))??;

        let status = child.wait()?;
        if !status.success() {
            return Err(BackendError::Exit {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        Ok(lines)
    }
}
