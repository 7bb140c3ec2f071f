//! Jyutping → Yale with tone diacritics.
//!
//! Conversion goes through a TeX-escaped intermediate (`s\=\i{}n`)
//! which [`to_yale`] turns into composed Unicode.

use unicode_normalization::UnicodeNormalization;

use super::lau::from_lau_incomplete;
use crate::syllable::split_syllables;
use crate::unicode::is_vowel;

const GRAVE: char = '\u{0300}';
const ACUTE: char = '\u{0301}';
const MACRON: char = '\u{0304}';

/// Letter substitutions applied to the whole input before splitting.
fn prepass(jyutping: &str) -> String {
    jyutping
        .to_lowercase()
        .replace("eo", "eu")
        .replace("oe", "eu")
        .replace('j', "y")
        .replace("yyu", "yu")
        .replace('z', "j")
        .replace('c', "ch")
}

/// TeX escape for a tone digit, and whether the tone takes the low-register `h`.
fn tone_mark(digit: char) -> Option<(&'static str, bool)> {
    match digit {
        '1' | '7' => Some((r"\=", false)),
        '2' => Some((r"\'", false)),
        '3' => Some(("", false)),
        '4' => Some((r"\`", true)),
        '5' => Some((r"\'", true)),
        '6' => Some(("", true)),
        _ => None,
    }
}

/// `h?(m|ng)[4-6]` at the start of a vowelless syllable: returns the nucleus
/// (the nasal) and the position the tone `h` follows.
fn standalone_nasal(chars: &[char]) -> Option<(usize, usize)> {
    let start = usize::from(chars.first() == Some(&'h'));
    let (nasal_len, anchor_offset) = match chars.get(start..) {
        Some(['m', ..]) => (1, 0),
        Some(['n', 'g', ..]) => (2, 1),
        _ => return None,
    };
    let tone = *chars.get(start + nasal_len)?;
    matches!(tone, '4'..='6').then_some((start, start + anchor_offset))
}

fn syllable_to_tex(syllable: &str) -> String {
    let mut chars: Vec<char> = syllable.chars().collect();
    let (nucleus, mut anchor) = match chars.iter().position(|&c| is_vowel(c)) {
        Some(n) => (n, n),
        None => match standalone_nasal(&chars) {
            Some(found) => found,
            None => return syllable.to_uppercase(),
        },
    };

    // final "aa" is written "a"
    if chars[nucleus..].starts_with(&['a', 'a'])
        && chars
            .get(nucleus + 2)
            .map_or(true, |c| ('1'..='6').contains(c))
    {
        chars.remove(nucleus);
    }

    if let Some(last_vowel) = chars.iter().rposition(|&c| is_vowel(c)) {
        anchor = last_vowel;
    }

    let Some((mark, low)) = chars.last().and_then(|&d| tone_mark(d)) else {
        return chars.iter().collect::<String>().to_uppercase();
    };
    chars.pop();
    if low {
        chars.insert(anchor + 1, 'h');
    }

    let onset: String = chars[..nucleus].iter().collect();
    let rest: String = chars[nucleus..].iter().collect();
    format!("{onset}{mark}{rest}")
        .replace(r"\=i", r"\=\i{}")
        .replace(r"\=I", r"\=\I{}")
}

/// Space-separated Yale syllables with TeX tone escapes.
///
/// Tokens that are not Jyutping syllables (Latin words, bare numbers) are
/// passed through upper-cased.
pub fn to_yale_tex(jyutping: &str) -> String {
    split_syllables(&prepass(jyutping))
        .iter()
        .map(|s| syllable_to_tex(s))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-separated Yale syllables with Unicode diacritics (NFC).
pub fn to_yale(jyutping: &str) -> String {
    let tex = to_yale_tex(jyutping)
        .replace(r"\i{}", "i")
        .replace(r"\I{}", "I");
    let mut out = String::with_capacity(tex.len());
    let mut chars = tex.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let combining = match chars.peek() {
                Some('`') => Some(GRAVE),
                Some('\'') => Some(ACUTE),
                Some('=') => Some(MACRON),
                _ => None,
            };
            if let Some(combining) = combining {
                let mut ahead = chars.clone();
                ahead.next();
                if let Some(base) = ahead.next() {
                    out.push(base);
                    out.push(combining);
                    chars = ahead;
                    continue;
                }
            }
        }
        out.push(c);
    }
    out.nfc().collect()
}

/// Sidney Lau → Yale via [`from_lau_incomplete`].
pub fn lau_to_yale_incomplete(lau: &str) -> String {
    to_yale(&from_lau_incomplete(lau))
}
