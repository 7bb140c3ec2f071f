//! Rewrites and scanning over tone-numbered Pinyin.

use crate::unicode::is_pinyin_tone;

/// Post-process raw normalizer output.
///
/// An erhua syllable such as `zher4` is split into `zhe4r5` so the `r`
/// counts as its own (silent) syllable, and a trailing toneless `a` gets an
/// explicit neutral tone.
pub fn rewrite_normalized(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let erhua = i > 0
            && chars[i - 1].is_ascii_alphabetic()
            && chars[i] == 'e'
            && chars.get(i + 1) == Some(&'r')
            && chars.get(i + 2).is_some_and(|&d| is_pinyin_tone(d));
        if erhua {
            out.push('e');
            out.push(chars[i + 2]);
            out.push_str("r5");
            i += 3;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    if out.ends_with('a') {
        out.push('5');
    }
    out
}

/// Extract `letters + tone digit` syllables, ignoring everything else.
pub fn syllables(normalized: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = None;
    for (i, c) in normalized.char_indices() {
        if c.is_ascii_alphabetic() {
            start.get_or_insert(i);
        } else if is_pinyin_tone(c) {
            result.push(&normalized[start.unwrap_or(i)..i + 1]);
            start = None;
        } else {
            start = None;
        }
    }
    result
}

/// Whether a word contains a syllable followed by a split-off erhua `r5`.
pub fn has_erhua(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes
        .windows(3)
        .any(|w| is_pinyin_tone(w[0] as char) && w[1] == b'r' && w[2] == b'5')
}
