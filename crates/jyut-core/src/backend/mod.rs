//! Boundary to the external phonetic lookup service.
//!
//! The resolver only ever talks to a [`Transliterator`]. Two implementations
//! ship with the crate: [`CommandTransliterator`] drives an external
//! line-oriented lookup process, [`TableTransliterator`] does longest-match
//! lookup in TSV reading tables.

mod command;
mod table;

pub use command::CommandTransliterator;
pub use table::{ReadingTable, TableTransliterator};

use std::io;

use crate::settings::{BackendKind, BackendSettings};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("lookup process exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("unknown scheme: {0}")]
    UnknownScheme(String),

    #[error("reading table {path}:{line}: {reason}")]
    Table {
        path: String,
        line: usize,
        reason: String,
    },
}

pub trait Transliterator {
    /// Transliterate `text` into the phonetic scheme `scheme`.
    fn transliterate(&self, scheme: &str, text: &str) -> Result<String, BackendError>;

    /// Order-preserving batch variant. Must return exactly one result per input.
    fn transliterate_batch(
        &self,
        scheme: &str,
        texts: &[String],
    ) -> Result<Vec<String>, BackendError> {
        texts
            .iter()
            .map(|text| self.transliterate(scheme, text))
            .collect()
    }
}

/// Build the backend described by the `[backend]` settings section.
pub fn from_settings(s: &BackendSettings) -> Result<Box<dyn Transliterator>, BackendError> {
    match s.kind {
        BackendKind::Command => Ok(Box::new(CommandTransliterator::new(s.command.clone())?)),
        BackendKind::Table => {
            let mut backend = TableTransliterator::new();
            for (scheme, path) in &s.tables {
                let table = ReadingTable::open(path)?;
                let joiner = if *scheme == s.cantonese_scheme { " " } else { "" };
                backend.add_scheme(scheme, table, joiner);
            }
            Ok(Box::new(backend))
        }
    }
}
