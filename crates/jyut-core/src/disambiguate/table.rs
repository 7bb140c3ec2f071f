use std::collections::HashMap;
use std::sync::OnceLock;

/// Compact source rows: every character of the first field shares the
/// readings; every space-separated Pinyin variant of a reading key maps to
/// the same Jyutping.
type Row = (&'static str, &'static [(&'static str, &'static str)]);

const ROWS: &[Row] = &[
    ("中", &[("zhong1", "zung1"), ("zhong4", "zung3")]),
    ("为為", &[("wei2", "wai4"), ("wei4", "wai6")]),
    ("乐樂", &[("le4", "lok6"), ("yue4", "ngok6")]),
    ("亲親", &[("qin1", "can1"), ("qing4", "can3")]),
    // unless zaap6
    ("什", &[("shen2", "sam6"), ("shi2", "sap6")]),
    ("传傳", &[("chuan2", "cyun4"), ("zhuan4", "zyun6")]),
    ("便", &[("bian4", "bin6"), ("pian2", "pin4")]),
    ("假", &[("jia3", "gaa2"), ("jia4", "gaa3")]),
    ("兴興", &[("xing1", "hing1"), ("xing4", "hing3")]),
    ("创創", &[("chuang1", "cong1"), ("chuang4", "cong3")]),
    ("只", &[("zhi1", "zek3"), ("zhi3", "zi2")]),
    ("号號", &[("hao4", "hou6"), ("hao2", "hou4")]),
    ("和", &[("he2", "wo4"), ("he4", "wo6")]),
    ("咽", &[("yan1", "jin1"), ("yan4", "jin3"), ("ye4", "jit3")]),
    ("圈", &[("juan4", "gyun6"), ("quan1", "hyun1")]),
    ("好", &[("hao3", "hou2"), ("hao4", "hou3")]),
    ("将將", &[("jiang1", "zoeng1"), ("jiang4", "zoeng3")]),
    ("少", &[("shao3", "siu2"), ("shao4", "siu3")]),
    (
        "差",
        &[("cha4", "caa1"), ("cha1", "caa1"), ("chai1", "caai1")],
    ),
    ("強强", &[("qiang2", "koeng4"), ("qiang3", "koeng5")]),
    ("担擔", &[("dan1", "daam1"), ("dan4", "daam3")]),
    ("挣掙", &[("zheng4", "zaang6"), ("zheng1", "zang1")]),
    ("数數", &[("shu3", "sou2"), ("shu4", "sou3")]),
    ("朝", &[("chao2", "ciu4"), ("zhao1", "ziu1")]),
    ("滑", &[("hua2", "waat6"), ("gu3", "gwat1")]),
    ("漂", &[("piao1", "piu1"), ("piao3 piao4", "piu3")]),
    ("盛", &[("sheng4", "sing6"), ("cheng2", "sing4")]),
    ("相", &[("xiang1", "soeng1"), ("xiang4", "soeng3")]),
    ("看", &[("kan4", "hon3"), ("kan1", "hon1")]),
    ("种種", &[("zhong3", "zung2"), ("zhong4", "zung3")]),
    ("绷繃", &[("beng1", "bang1"), ("beng3", "maang1")]),
    ("落", &[("luo1 luo4 lao4", "lok6"), ("la4", "laai6")]),
    (
        "著",
        &[
            ("zhu4", "zyu3"),
            ("zhuo2", "zoek3"),
            ("zhuo2 zhao2 zhao1 zhe5", "zoek6"),
        ],
    ),
    ("要", &[("yao4", "jiu3"), ("yao1", "jiu1")]),
    ("见見", &[("jian4", "gin3"), ("xian4", "jin6")]),
    ("觉覺", &[("jue2", "gok3"), ("jiao4", "gaau3")]),
    ("識识", &[("shi2 shi4", "sik1"), ("zhi4", "zi3")]),
    ("調调", &[("diao4", "diu6"), ("tiao2", "tiu4")]),
    ("量", &[("liang2", "loeng4"), ("liang4", "loeng6")]),
    ("長长", &[("chang2", "coeng4"), ("zhang3", "zoeng2")]),
    ("間间", &[("jian1", "gaan1"), ("jian4", "gaan3")]),
    ("难難", &[("nan2", "naan4"), ("nan4", "naan6")]),
];

/// Per-character Mandarin reading → Cantonese reading, for characters whose
/// Cantonese reading depends on which Mandarin reading applies.
pub struct AmbiguityTable {
    map: HashMap<char, HashMap<String, String>>,
}

impl AmbiguityTable {
    /// Get or initialize the global table.
    pub fn global() -> &'static AmbiguityTable {
        static INSTANCE: OnceLock<AmbiguityTable> = OnceLock::new();
        INSTANCE.get_or_init(|| build(ROWS))
    }

    pub fn contains(&self, c: char) -> bool {
        self.map.contains_key(&c)
    }

    pub fn contains_any(&self, text: &str) -> bool {
        text.chars().any(|c| self.contains(c))
    }

    /// Corrected Jyutping for `c` read as `pinyin` (compared lower-cased).
    pub fn get(&self, c: char, pinyin: &str) -> Option<&str> {
        self.map
            .get(&c)
            .and_then(|readings| readings.get(&pinyin.to_lowercase()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Expand compact rows into one entry per (character, Pinyin syllable).
/// Later rows win when a character appears twice.
fn build(rows: &[Row]) -> AmbiguityTable {
    let mut map = HashMap::new();
    for &(chars, readings) in rows {
        let mut expanded = HashMap::new();
        for &(pinyin_variants, jyutping) in readings {
            for pinyin in pinyin_variants.split_whitespace() {
                expanded.insert(pinyin.to_string(), jyutping.to_string());
            }
        }
        for c in chars.chars() {
            map.insert(c, expanded.clone());
        }
    }
    AmbiguityTable { map }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_char_rows_expand() {
        let t = AmbiguityTable::global();
        assert_eq!(t.get('長', "zhang3"), Some("zoeng2"));
        assert_eq!(t.get('长', "zhang3"), Some("zoeng2"));
        assert_eq!(t.get('长', "chang2"), Some("coeng4"));
    }

    #[test]
    fn test_multi_reading_keys_expand() {
        let t = AmbiguityTable::global();
        for p in ["luo1", "luo4", "lao4"] {
            assert_eq!(t.get('落', p), Some("lok6"));
        }
        assert_eq!(t.get('落', "luo1 luo4 lao4"), None);
        assert_eq!(t.get('著', "zhe5"), Some("zoek6"));
        // the later variant list overrides the earlier single key
        assert_eq!(t.get('著', "zhuo2"), Some("zoek6"));
    }

    #[test]
    fn test_lookup_is_case_insensitive_on_pinyin() {
        let t = AmbiguityTable::global();
        assert_eq!(t.get('中', "Zhong1"), Some("zung1"));
        assert_eq!(t.get('中', "zhong4"), Some("zung3"));
        assert_eq!(t.get('中', "zhong3"), None);
    }

    #[test]
    fn test_contains_any() {
        let t = AmbiguityTable::global();
        assert!(t.contains_any("我中意"));
        assert!(!t.contains_any("我哋"));
        assert!(!t.is_empty());
    }

    #[test]
    fn test_build_is_pure() {
        let rows: &[Row] = &[("甲乙", &[("a1 a2", "x1")]), ("乙", &[("b3", "y3")])];
        let t = build(rows);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get('甲', "a2"), Some("x1"));
        assert_eq!(t.get('乙', "a1"), None);
        assert_eq!(t.get('乙', "b3"), Some("y3"));
    }
}
