use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{BackendError, Transliterator};
use crate::unicode::is_hanzi;

#[derive(Default)]
struct Node {
    children: HashMap<char, Node>,
    reading: Option<String>,
}

/// Character trie over `key → reading` pairs with longest-prefix lookup.
#[derive(Default)]
pub struct ReadingTable {
    root: Node,
    len: usize,
}

impl ReadingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TSV reading table: `key<TAB>reading` per line, `#` comments.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|(line, reason)| BackendError::Table {
            path: path.display().to_string(),
            line,
            reason,
        })
    }

    /// Parse TSV content. Errors carry the 1-based line number.
    pub fn parse(content: &str) -> Result<Self, (usize, String)> {
        let mut table = Self::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, reading)) = line.split_once('\t') else {
                return Err((idx + 1, "expected key<TAB>reading".to_string()));
            };
            let reading = reading.trim();
            if key.is_empty() || reading.is_empty() {
                return Err((idx + 1, "empty key or reading".to_string()));
            }
            table.insert(key, reading);
        }
        Ok(table)
    }

    /// Insert a mapping. The first reading given for a key wins.
    pub fn insert(&mut self, key: &str, reading: &str) {
        let mut node = &mut self.root;
        for c in key.chars().flat_map(char::to_lowercase) {
            node = node.children.entry(c).or_default();
        }
        if node.reading.is_none() {
            node.reading = Some(reading.to_string());
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Longest key that prefixes `chars`: returns (chars consumed, reading).
    pub fn longest_prefix(&self, chars: &[char]) -> Option<(usize, &str)> {
        let mut node = &self.root;
        let mut best = None;
        for (i, c) in chars.iter().enumerate() {
            match node.children.get(c) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(reading) = &node.reading {
                best = Some((i + 1, reading.as_str()));
            }
        }
        best
    }

    /// Greedy longest-match transliteration.
    ///
    /// Readings and runs of unmatched characters are separated by `joiner`;
    /// whitespace runs collapse to one space. Unmatched hanzi and non-ASCII
    /// punctuation are dropped, so text with no known reading yields an empty
    /// string; other unmatched characters (Latin words, digits) are kept.
    pub fn transliterate(&self, text: &str, joiner: &str) -> String {
        let chars: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
        let mut out = String::with_capacity(text.len() * 2);
        let mut prev = Piece::Gap;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c.is_whitespace() {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                prev = Piece::Gap;
                i += 1;
                continue;
            }
            match self.longest_prefix(&chars[i..]) {
                Some((consumed, reading)) => {
                    if prev != Piece::Gap {
                        out.push_str(joiner);
                    }
                    out.push_str(reading);
                    prev = Piece::Reading;
                    i += consumed;
                }
                None if is_dropped(c) => i += 1,
                None => {
                    if prev == Piece::Reading {
                        out.push_str(joiner);
                    }
                    out.push(c);
                    prev = Piece::Unmatched;
                    i += 1;
                }
            }
        }

        out.trim().to_string()
    }
}

/// What was last written by [`ReadingTable::transliterate`].
#[derive(Clone, Copy, PartialEq, Eq)]
enum Piece {
    Gap,
    Reading,
    Unmatched,
}

fn is_dropped(c: char) -> bool {
    is_hanzi(c) || (!c.is_ascii() && !c.is_alphanumeric())
}

struct Scheme {
    table: ReadingTable,
    joiner: String,
}

/// In-process backend backed by one [`ReadingTable`] per scheme.
#[derive(Default)]
pub struct TableTransliterator {
    schemes: HashMap<String, Scheme>,
}

impl TableTransliterator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the table used for `scheme`.
    pub fn add_scheme(&mut self, scheme: &str, table: ReadingTable, joiner: &str) {
        self.schemes.insert(
            scheme.to_string(),
            Scheme {
                table,
                joiner: joiner.to_string(),
            },
        );
    }
}

impl Transliterator for TableTransliterator {
    fn transliterate(&self, scheme: &str, text: &str) -> Result<String, BackendError> {
        let s = self
            .schemes
            .get(scheme)
            .ok_or_else(|| BackendError::UnknownScheme(scheme.to_string()))?;
        Ok(s.table.transliterate(text, &s.joiner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canto() -> ReadingTable {
        ReadingTable::parse(
            "# test table\n中\tzung1\n文\tman4\n中文\tzung1 man2\n好\thou2\n好\thou3\n",
        )
        .unwrap()
    }

    fn pinyin() -> ReadingTable {
        ReadingTable::parse("zhōng\tzhong1\nguó\tguo2\nma\tma5\nér\ter2\n").unwrap()
    }

    #[test]
    fn test_first_reading_wins() {
        let t = canto();
        assert_eq!(t.len(), 4);
        assert_eq!(t.transliterate("好", " "), "hou2");
    }

    #[test]
    fn test_longest_prefix_preferred() {
        let t = canto();
        assert_eq!(t.transliterate("中文", " "), "zung1 man2");
        assert_eq!(t.transliterate("文中", " "), "man4 zung1");
    }

    #[test]
    fn test_latin_run_kept_as_own_token() {
        let t = canto();
        assert_eq!(t.transliterate("中DVD文", " "), "zung1 dvd man4");
        assert_eq!(t.transliterate("DVD中", " "), "dvd zung1");
        assert_eq!(t.transliterate("中 文", " "), "zung1 man4");
        assert_eq!(t.transliterate("  中   ", " "), "zung1");
    }

    #[test]
    fn test_unknown_hanzi_dropped() {
        let t = canto();
        assert_eq!(t.transliterate("中𪚥文", " "), "zung1 man4");
        assert_eq!(t.transliterate("中，文。", " "), "zung1 man4");
        assert_eq!(t.transliterate("𪚥", " "), "");
        assert_eq!(t.transliterate("𪚥 龘", " "), "");
    }

    #[test]
    fn test_latin_run_reaches_yale_as_pass_through() {
        let t = canto();
        let jyutping = t.transliterate("中DVD文", " ");
        assert_eq!(crate::romanize::to_yale(&jyutping), "jūng DVD màhn");
    }

    #[test]
    fn test_pinyin_syllables_joined_without_space() {
        let t = pinyin();
        assert_eq!(t.transliterate("Zhōngguó", ""), "zhong1guo2");
        assert_eq!(t.transliterate("zhōng guó", ""), "zhong1 guo2");
        assert_eq!(t.transliterate("zhōng-guó", ""), "zhong1-guo2");
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let err = ReadingTable::parse("中\tzung1\nbroken line\n").err().unwrap();
        assert_eq!(err.0, 2);
        let err = ReadingTable::parse("中\t \n").err().unwrap();
        assert_eq!(err.0, 1);
    }

    #[test]
    fn test_unknown_scheme() {
        let mut t = TableTransliterator::new();
        t.add_scheme("zhy", canto(), " ");
        assert_eq!(t.transliterate("zhy", "中文").unwrap(), "zung1 man2");
        assert!(matches!(
            t.transliterate("zh", "zhōng"),
            Err(BackendError::UnknownScheme(_))
        ));
    }

    #[test]
    fn test_default_batch_preserves_order() {
        let mut t = TableTransliterator::new();
        t.add_scheme("zhy", canto(), " ");
        let texts = vec!["文".to_string(), "中".to_string(), "".to_string()];
        assert_eq!(
            t.transliterate_batch("zhy", &texts).unwrap(),
            vec!["man4".to_string(), "zung1".to_string(), String::new()]
        );
    }

    #[test]
    fn test_open_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canto.tsv");
        fs::write(&path, "中\tzung1\n").unwrap();
        let t = ReadingTable::open(&path).unwrap();
        assert_eq!(t.transliterate("中", " "), "zung1");

        fs::write(&path, "oops\n").unwrap();
        assert!(matches!(
            ReadingTable::open(&path),
            Err(BackendError::Table { line: 1, .. })
        ));
    }
}
