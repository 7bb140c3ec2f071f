//! Syllable splitting and word grouping for display.

use tracing::debug;

use crate::resolver::{pinyin, ResolveError, Resolver};
use crate::unicode::is_pinyin_tone;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("group lengths sum to {groups} but there are {syllables} syllables")]
    LengthMismatch { groups: usize, syllables: usize },
}

/// Split tone-numbered romanization into syllables.
///
/// ASCII punctuation counts as a separator and a syllable ends after each
/// tone digit 1 to 9 that is not part of a longer number.
pub fn split_syllables(text: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if is_separator(c) {
            spaced.push(' ');
            continue;
        }
        spaced.push(c);
        if matches!(c, '1'..='9') && !chars.peek().is_some_and(|n| n.is_ascii_digit()) {
            spaced.push(' ');
        }
    }
    spaced.split_whitespace().map(str::to_string).collect()
}

fn is_separator(c: char) -> bool {
    matches!(c, '!'..='/' | ':'..='@' | '^'..='`')
}

/// Joins syllables with `-` inside a word and ` ` between words.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grouper {
    /// Put every syllable into a single hyphenated group.
    pub hyphenate_all: bool,
}

impl Grouper {
    pub fn new(hyphenate_all: bool) -> Self {
        Self { hyphenate_all }
    }

    /// Without `group_lengths` (or with none given) every syllable is its own
    /// group.
    pub fn group_and_hyphenate<S: AsRef<str>>(
        &self,
        syllables: &[S],
        group_lengths: Option<&[usize]>,
    ) -> Result<String, GroupingError> {
        let lengths: Vec<usize> = match group_lengths {
            _ if self.hyphenate_all => vec![syllables.len()],
            Some(lengths) if !lengths.is_empty() => lengths.to_vec(),
            _ => vec![1; syllables.len()],
        };

        let total: usize = lengths.iter().sum();
        if total != syllables.len() {
            return Err(GroupingError::LengthMismatch {
                groups: total,
                syllables: syllables.len(),
            });
        }

        let mut groups = Vec::with_capacity(lengths.len());
        let mut start = 0;
        for len in lengths {
            let word: Vec<&str> = syllables[start..start + len]
                .iter()
                .map(AsRef::as_ref)
                .collect();
            groups.push(word.join("-"));
            start += len;
        }
        Ok(groups.join(" "))
    }
}

/// Outcome of deriving word lengths from a Pinyin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    Grouped(Vec<usize>),
    Mismatch { computed: Vec<usize>, wanted: usize },
}

/// Word lengths (in syllables) of a Pinyin line, to be applied to a
/// Cantonese reading of `wanted` syllables.
///
/// Each hyphen-separated part is normalized on its own so the grouping does
/// not depend on how the normalizer treats spacing. A silent erhua `r5`
/// that leaves the count one too high is dropped from its word.
pub fn pinyin_word_groups(
    resolver: &mut Resolver,
    pinyin_line: &str,
    wanted: usize,
) -> Result<Alignment, ResolveError> {
    let mut words = Vec::new();
    for word in pinyin_line.split_whitespace() {
        let mut parts = Vec::new();
        for part in word.split('-') {
            parts.push(resolver.normalize_pinyin(part)?);
        }
        words.push(parts.join("-"));
    }
    let joined = words.join(" ");

    let mut groups = vec![0usize];
    let mut chars = joined.chars().peekable();
    while let Some(c) = chars.next() {
        if !is_pinyin_tone(c) {
            continue;
        }
        if let Some(last) = groups.last_mut() {
            *last += 1;
        }
        if chars.peek() == Some(&' ') {
            groups.push(0);
        }
    }
    if groups.last() == Some(&0) {
        groups.pop();
    }

    if groups.iter().sum::<usize>() > wanted {
        let whole = resolver.normalize_pinyin(pinyin_line)?;
        for (i, word) in whole.split_whitespace().enumerate() {
            if !pinyin::has_erhua(word) {
                continue;
            }
            if let Some(g) = groups.get_mut(i).filter(|g| **g > 0) {
                *g -= 1;
            }
            if groups.iter().sum::<usize>() == wanted {
                break;
            }
        }
    }

    if groups.iter().sum::<usize>() != wanted {
        debug!(?groups, wanted, "pinyin grouping does not fit reading");
        return Ok(Alignment::Mismatch {
            computed: groups,
            wanted,
        });
    }
    Ok(Alignment::Grouped(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{resolver_with, sample_backend};

    #[test]
    fn test_split_on_tone_digits() {
        assert_eq!(split_syllables("zung1man4"), vec!["zung1", "man4"]);
        assert_eq!(split_syllables("zung1 man4"), vec!["zung1", "man4"]);
        assert_eq!(split_syllables("ngo5, nei5!"), vec!["ngo5", "nei5"]);
    }

    #[test]
    fn test_split_keeps_numbers_together() {
        assert_eq!(split_syllables("2008 nin4"), vec!["2008", "nin4"]);
        assert_eq!(split_syllables("a10b"), vec!["a10b"]);
        assert_eq!(split_syllables("dvd"), vec!["dvd"]);
    }

    #[test]
    fn test_split_punctuation_ranges() {
        assert_eq!(split_syllables("a-b_c`d^e"), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(split_syllables("x@y[z]"), vec!["x", "y[z]"]);
        assert!(split_syllables("").is_empty());
    }

    #[test]
    fn test_group_with_lengths() {
        let g = Grouper::default();
        let out = g
            .group_and_hyphenate(&["syl1", "syl2", "syl3"], Some(&[2, 1]))
            .unwrap();
        assert_eq!(out, "syl1-syl2 syl3");
    }

    #[test]
    fn test_group_without_lengths() {
        let g = Grouper::default();
        assert_eq!(g.group_and_hyphenate(&["a1", "b2"], None).unwrap(), "a1 b2");
        assert_eq!(
            g.group_and_hyphenate(&["a1", "b2"], Some(&[])).unwrap(),
            "a1 b2"
        );
        assert_eq!(g.group_and_hyphenate::<&str>(&[], None).unwrap(), "");
    }

    #[test]
    fn test_hyphenate_all_ignores_lengths() {
        let g = Grouper::new(true);
        let out = g
            .group_and_hyphenate(&["a1", "b2", "c3"], Some(&[1, 2]))
            .unwrap();
        assert_eq!(out, "a1-b2-c3");
    }

    #[test]
    fn test_group_length_mismatch() {
        let g = Grouper::default();
        let err = g
            .group_and_hyphenate(&["a1", "b2"], Some(&[3]))
            .unwrap_err();
        assert_eq!(
            err,
            GroupingError::LengthMismatch {
                groups: 3,
                syllables: 2
            }
        );
    }

    #[test]
    fn test_word_groups_from_hyphens_and_spaces() {
        let (mut r, _) = resolver_with(sample_backend());
        r.finish_collecting().unwrap();
        let a = pinyin_word_groups(&mut r, "zhōng-wén hǎo", 3).unwrap();
        assert_eq!(a, Alignment::Grouped(vec![2, 1]));
    }

    #[test]
    fn test_silent_r_is_dropped() {
        let (mut r, _) = resolver_with(sample_backend());
        r.finish_collecting().unwrap();
        let a = pinyin_word_groups(&mut r, "zhèr hǎo", 2).unwrap();
        assert_eq!(a, Alignment::Grouped(vec![1, 1]));
    }

    #[test]
    fn test_unfixable_count_is_a_mismatch() {
        let (mut r, _) = resolver_with(sample_backend());
        r.finish_collecting().unwrap();
        let a = pinyin_word_groups(&mut r, "zhōng", 2).unwrap();
        assert_eq!(
            a,
            Alignment::Mismatch {
                computed: vec![1],
                wanted: 2
            }
        );
    }

    #[test]
    fn test_normalizer_failure_propagates() {
        let (mut r, _) = resolver_with(sample_backend());
        r.finish_collecting().unwrap();
        assert!(pinyin_word_groups(&mut r, "qwrtz", 1).is_err());
    }
}
