/// Ordered fragment substitutions, longest source first.
///
/// Rules are applied one after another over the whole string, each replacing
/// every non-overlapping occurrence left to right. Text produced by a rule is
/// final: later rules only see the parts no earlier rule consumed.
#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    rules: Vec<(String, String)>,
}

enum Piece<'a> {
    Raw(&'a str),
    Done(&'a str),
}

impl SubstitutionTable {
    /// Build from `(from, to)` pairs. Rules are stably sorted by descending
    /// source length, so equal-length rules keep their given order.
    pub fn new<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut rules: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .filter(|(from, _)| !from.is_empty())
            .collect();
        rules.sort_by_key(|(from, _)| std::cmp::Reverse(from.chars().count()));
        Self { rules }
    }

    /// Table mapping each target back to its source.
    pub fn reversed(&self) -> Self {
        Self::new(
            self.rules
                .iter()
                .map(|(from, to)| (to.to_lowercase(), from.clone())),
        )
    }

    pub fn rules(&self) -> &[(String, String)] {
        &self.rules
    }

    pub fn apply(&self, text: &str) -> String {
        let mut pieces = vec![Piece::Raw(text)];
        for (from, to) in &self.rules {
            let mut next = Vec::with_capacity(pieces.len());
            for piece in pieces {
                let raw = match piece {
                    Piece::Raw(raw) => raw,
                    done => {
                        next.push(done);
                        continue;
                    }
                };
                let mut last = 0;
                for (i, _) in raw.match_indices(from.as_str()) {
                    if i > last {
                        next.push(Piece::Raw(&raw[last..i]));
                    }
                    next.push(Piece::Done(to.as_str()));
                    last = i + from.len();
                }
                if last < raw.len() {
                    next.push(Piece::Raw(&raw[last..]));
                }
            }
            pieces = next;
        }

        pieces
            .into_iter()
            .map(|p| match p {
                Piece::Raw(s) | Piece::Done(s) => s,
            })
            .collect()
    }
}
