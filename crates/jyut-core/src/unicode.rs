//! Character-level classification for Chinese text and romanizations.

/// Hanzi range used for alignment: CJK Unified Ideographs through Yi
/// (U+4E00..U+A6FF) plus everything outside the BMP.
pub fn is_hanzi(c: char) -> bool {
    ('\u{4E00}'..'\u{A700}').contains(&c) || c >= '\u{10000}'
}

/// Keep only hanzi-range characters, dropping punctuation, Latin and the
/// CJK extension A block.
pub fn hanzi_only(text: &str) -> String {
    text.chars().filter(|&c| is_hanzi(c)).collect()
}

/// Jyutping tone digits (7 is a high-entering variant of 1).
pub fn is_jyutping_tone(c: char) -> bool {
    matches!(c, '1'..='7')
}

/// Tone-numbered Pinyin tone digits (5 is the neutral tone).
pub fn is_pinyin_tone(c: char) -> bool {
    matches!(c, '1'..='5')
}

pub fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
