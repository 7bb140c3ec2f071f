use jyut_core::romanize::{from_lau_incomplete, lau_to_yale_incomplete};

/// Convert Sidney Lau lines back to Jyutping, or to Yale with `yale`.
/// Best effort: Lau syllables written with a shortened `aa` stay short.
pub fn from_lau(lines: &[String], yale: bool) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            if yale {
                lau_to_yale_incomplete(line)
            } else {
                from_lau_incomplete(line)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lau() {
        let lines = vec!["heung1 gong2".to_string(), "yat1".to_string()];
        assert_eq!(from_lau(&lines, false), vec!["hoeng1 gong2", "jat1"]);
        assert_eq!(from_lau(&lines, true), vec!["hēung góng", "yāt"]);
    }
}
