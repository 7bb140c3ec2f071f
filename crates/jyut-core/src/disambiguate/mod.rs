//! Pinyin-guided correction of Cantonese readings.
//!
//! Some characters have several Cantonese readings that line up with
//! distinct Mandarin readings (中 zhong1/zhong4 → zung1/zung3). Given a
//! proof-read Pinyin line aligned with the hanzi, the Jyutping syllable of
//! each such character is replaced by the one the Pinyin selects. This is a
//! best-effort heuristic: whenever alignment is impossible the input is
//! returned untouched.

mod table;

pub use table::AmbiguityTable;

use tracing::{debug, debug_span};

use crate::resolver::{pinyin, ResolveError, Resolver};
use crate::unicode::{hanzi_only, is_jyutping_tone};

/// Correct `jyutping` (the reading of `hanzi`) using the aligned `pinyin`.
///
/// Pinyin is only normalized when at least one hanzi is ambiguous.
pub fn adjust(
    resolver: &mut Resolver,
    hanzi: &str,
    jyutping: &str,
    pinyin: &str,
) -> Result<String, ResolveError> {
    let stripped = hanzi_only(hanzi);
    if !AmbiguityTable::global().contains_any(&stripped) {
        return Ok(jyutping.to_string());
    }
    let normalized = resolver.normalize_pinyin(pinyin)?;
    Ok(adjust_aligned(&stripped, jyutping, &normalized))
}

/// Core of [`adjust`] over already-stripped hanzi and normalized Pinyin.
pub fn adjust_aligned(hanzi: &str, jyutping: &str, normalized_pinyin: &str) -> String {
    let _span = debug_span!("adjust_aligned").entered();
    let table = AmbiguityTable::global();
    let syllables = pinyin::syllables(normalized_pinyin);
    if syllables.len() != hanzi.chars().count() {
        debug!(
            hanzi = hanzi.chars().count(),
            pinyin = syllables.len(),
            "syllable count mismatch, leaving reading as is"
        );
        return jyutping.to_string();
    }

    let mut boundaries = jyutping
        .char_indices()
        .filter(|&(_, c)| is_jyutping_tone(c))
        .map(|(i, c)| i + c.len_utf8());
    let mut out = String::with_capacity(jyutping.len());
    let mut start = 0;

    for (h, p) in hanzi.chars().zip(syllables) {
        // A hanzi with no Cantonese reading leaves us short of syllables.
        let Some(end) = boundaries.next() else {
            debug!("ran out of Jyutping syllables, leaving reading as is");
            return jyutping.to_string();
        };
        let segment = &jyutping[start..end];
        match table.get(h, p) {
            Some(corrected) => {
                out.push_str(&segment[..syllable_start(segment)]);
                out.push_str(corrected);
            }
            None => out.push_str(segment),
        }
        start = end;
    }

    out.push_str(&jyutping[start..]);
    out
}

/// Byte offset where the trailing `letters + tone digit` run of `segment`
/// begins; everything before it (separators) is kept.
fn syllable_start(segment: &str) -> usize {
    let body = &segment[..segment.len() - 1];
    body.trim_end_matches(|c: char| c.is_ascii_alphabetic()).len()
}
