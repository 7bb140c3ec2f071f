//! The stdin-to-stdout romanization pipeline.

use clap::ValueEnum;
use tracing::{debug_span, warn};

use jyut_core::disambiguate::adjust;
use jyut_core::resolver::{ResolveError, Resolver};
use jyut_core::romanize::{superscript_html, to_lau, to_yale};
use jyut_core::settings::settings;
use jyut_core::syllable::{pinyin_word_groups, split_syllables, Alignment, Grouper, GroupingError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Sidney Lau with HTML superscript tones
    #[default]
    Lau,
    /// Yale with tone diacritics
    Yale,
    /// Yale#Lau
    YaleLau,
    /// Yale#Jyutping
    YalePing,
    /// Yale#Lau#Jyutping
    YaleLauPing,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub format: OutputFormat,
    pub hyphenate_all: bool,
    /// Apply the `[lyrics]` substitutions before looking readings up.
    pub song_lyrics: bool,
    /// Emit an empty reading instead of an ungrouped one when the Pinyin
    /// does not line up with the Cantonese syllables.
    pub omit_misaligned: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Grouping(#[from] GroupingError),
}

/// Split raw input into lines; a final empty line is not an input line.
pub fn split_lines(input: &str) -> Vec<String> {
    let normalized = input.replace("\r\n", "\n");
    let mut lines: Vec<String> = normalized.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// `hanzi` or `hanzi#pinyin`.
fn parse_line(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((hanzi, pinyin)) if !pinyin.is_empty() => (hanzi, Some(pinyin)),
        Some((hanzi, _)) => (hanzi, None),
        None => (line, None),
    }
}

/// Romanize every line. Lookups for all lines are batched before the first
/// output line is produced.
pub fn run_batch(
    resolver: &mut Resolver,
    lines: &[String],
    opts: &BatchOptions,
) -> Result<Vec<String>, BatchError> {
    let _span = debug_span!("run_batch", lines = lines.len()).entered();
    let lookup_text = |hanzi: &str| {
        if opts.song_lyrics {
            settings().apply_lyrics(hanzi)
        } else {
            hanzi.to_string()
        }
    };

    for line in lines {
        let (hanzi, pinyin) = parse_line(line);
        resolver.resolve_jyutping(&lookup_text(hanzi), true)?;
        if let Some(pinyin) = pinyin {
            resolver.queue_pinyin(pinyin);
        }
    }
    resolver.finish_collecting()?;

    let grouper = Grouper::new(opts.hyphenate_all);
    let mut output = Vec::with_capacity(lines.len());
    for line in lines {
        let (hanzi, pinyin) = parse_line(line);
        let mut jyutping = resolver.resolve_jyutping(&lookup_text(hanzi), false)?;
        let mut groups = None;

        // an empty reading is usually a character with no Cantonese reading
        if let Some(pinyin) = pinyin.filter(|_| !jyutping.is_empty()) {
            jyutping = adjust(resolver, hanzi, &jyutping, pinyin)?;
            let wanted = split_syllables(&jyutping).len();
            match pinyin_word_groups(resolver, pinyin, wanted)? {
                Alignment::Grouped(lengths) => groups = Some(lengths),
                Alignment::Mismatch { computed, wanted } => {
                    warn!(
                        pinyin,
                        jyutping = jyutping.as_str(),
                        line = hanzi,
                        ?computed,
                        wanted,
                        "could not fit pinyin words to reading"
                    );
                    if opts.omit_misaligned {
                        jyutping.clear();
                    }
                }
            }
        }

        output.push(render(&grouper, &jyutping, groups.as_deref(), opts.format)?);
    }
    Ok(output)
}

fn yale(grouper: &Grouper, jyutping: &str, groups: Option<&[usize]>) -> Result<String, GroupingError> {
    let yale = to_yale(jyutping);
    let syllables: Vec<&str> = yale.split_whitespace().collect();
    grouper.group_and_hyphenate(&syllables, groups)
}

fn lau(grouper: &Grouper, jyutping: &str, groups: Option<&[usize]>) -> Result<String, GroupingError> {
    let syllables = split_syllables(&to_lau(jyutping));
    Ok(superscript_html(&grouper.group_and_hyphenate(&syllables, groups)?))
}

fn render(
    grouper: &Grouper,
    jyutping: &str,
    groups: Option<&[usize]>,
    format: OutputFormat,
) -> Result<String, GroupingError> {
    let ping = || jyutping.replace(' ', "");
    Ok(match format {
        OutputFormat::Lau => lau(grouper, jyutping, groups)?,
        OutputFormat::Yale => yale(grouper, jyutping, groups)?,
        OutputFormat::YaleLau => format!(
            "{}#{}",
            yale(grouper, jyutping, groups)?,
            lau(grouper, jyutping, groups)?
        ),
        OutputFormat::YalePing => format!("{}#{}", yale(grouper, jyutping, groups)?, ping()),
        OutputFormat::YaleLauPing => format!(
            "{}#{}#{}",
            yale(grouper, jyutping, groups)?,
            lau(grouper, jyutping, groups)?,
            ping()
        ),
    })
}
