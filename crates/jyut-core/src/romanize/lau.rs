//! Jyutping ↔ Sidney Lau.

use std::sync::OnceLock;

use super::rules::SubstitutionTable;

/// Finals spelled the same in both schemes. Listing them lets them claim
/// their letters before the shorter vowel rules below can.
const SHARED_FINALS: &str = "aai aau aam aang aan aap aat aak ai au am ang an ap at ak a \
     ei eng ek e iu im ing in ip it ik i oi ong on ot ok ung uk";

const CHANGED: &[(&str, &str)] = &[
    ("eoi", "ui"),
    ("eon", "un"),
    ("eot", "ut"),
    ("eok", "euk"),
    ("oeng", "eung"),
    ("oe", "euh"),
    ("c", "ch"),
    ("ou", "o"),
    ("o", "oh"),
    // covers jyu → yue once j has become y
    ("yu", "ue"),
    // covers ui → ooi, un → oon, ut → oot
    ("u", "oo"),
];

fn forward_table() -> &'static SubstitutionTable {
    static TABLE: OnceLock<SubstitutionTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let shared = SHARED_FINALS.split_whitespace().map(|f| (f, f));
        SubstitutionTable::new(shared.chain(CHANGED.iter().copied()))
    })
}

fn reverse_table() -> &'static SubstitutionTable {
    static TABLE: OnceLock<SubstitutionTable> = OnceLock::new();
    TABLE.get_or_init(|| forward_table().reversed())
}

/// Jyutping → Sidney Lau. Tone digits and separators pass through.
pub fn to_lau(jyutping: &str) -> String {
    let swapped = jyutping.to_lowercase().replace('j', "y").replace('z', "j");
    forward_table()
        .apply(&swapped)
        .to_lowercase()
        .replace("ohek", "euk")
}

/// Sidney Lau → Jyutping, best effort.
///
/// Incomplete: syllables whose `aa` was written as `a` in the Lau input come
/// back with a single `a`.
pub fn from_lau_incomplete(lau: &str) -> String {
    let prepared = lau.to_lowercase().replace("euk", "ohek");
    reverse_table()
        .apply(&prepared)
        .to_lowercase()
        .replace('j', "z")
        .replace('y', "j")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(to_lau("zung1 man4"), "jung1 man4");
        assert_eq!(to_lau("jat1"), "yat1");
        assert_eq!(to_lau("caa4"), "chaa4");
    }

    #[test]
    fn test_longest_fragment_wins() {
        assert_eq!(to_lau("zoeng1"), "jeung1");
        assert_eq!(to_lau("hoe1"), "heuh1");
        assert_eq!(to_lau("heoi3"), "hui3");
    }

    #[test]
    fn test_shared_finals_shield_vowels() {
        assert_eq!(to_lau("jung6"), "yung6");
        assert_eq!(to_lau("hoi1"), "hoi1");
        assert_eq!(to_lau("gong2"), "gong2");
    }

    #[test]
    fn test_vowel_remaps() {
        assert_eq!(to_lau("jyu4"), "yue4");
        assert_eq!(to_lau("jyun4"), "yuen4");
        assert_eq!(to_lau("fu1"), "foo1");
        assert_eq!(to_lau("gwui3"), "gwooi3");
        assert_eq!(to_lau("hou2"), "ho2");
        assert_eq!(to_lau("ngo5"), "ngoh5");
    }

    #[test]
    fn test_oek_becomes_euk() {
        assert_eq!(to_lau("hoek3"), "heuk3");
        assert_eq!(to_lau("zoek6"), "jeuk6");
    }

    #[test]
    fn test_lau_is_lowercase() {
        assert_eq!(to_lau("ZUNG1 Man4"), "jung1 man4");
    }

    #[test]
    fn test_reverse_common_syllables() {
        assert_eq!(from_lau_incomplete("jung1 man4"), "zung1 man4");
        assert_eq!(from_lau_incomplete("hui3"), "heoi3");
        assert_eq!(from_lau_incomplete("jeung1"), "zoeng1");
        assert_eq!(from_lau_incomplete("ho2"), "hou2");
        assert_eq!(from_lau_incomplete("heuk3"), "hoek3");
        assert_eq!(from_lau_incomplete("chaa4"), "caa4");
    }

    #[test]
    fn test_reverse_is_incomplete_for_short_a() {
        // Lau "a" may stand for Jyutping "aa"; it is not restored.
        assert_eq!(from_lau_incomplete("ga1"), "ga1");
    }
}
