use std::collections::HashSet;

use super::{KanaEntry, KanaOutput};

#[derive(Debug, PartialEq)]
pub enum MatchResult<'a> {
    NoMatch,
    /// Some key strictly extends the pending input; wait for more keys.
    PartialMatch,
    /// `consumed` is the byte length of the matched key.
    Match {
        output: &'a KanaOutput,
        consumed: usize,
    },
}

/// Entries kept sorted by key in code-point order.
#[derive(Debug, Clone, Default)]
pub struct KanaTable {
    entries: Vec<(String, KanaOutput)>,
}

impl KanaTable {
    pub fn from_entries(entries: Vec<KanaEntry>) -> Self {
        let mut table = Self::default();
        table.merge(entries);
        table
    }

    /// Merge new entries over the existing ones.
    ///
    /// For duplicate keys the first occurrence wins, so new entries shadow
    /// old ones and, within one batch, earlier entries shadow later ones.
    /// A `None` output removes the key.
    pub fn merge(&mut self, entries: Vec<KanaEntry>) {
        let old = std::mem::take(&mut self.entries);
        let mut seen = HashSet::new();
        let mut merged: Vec<(String, KanaOutput)> = entries
            .into_iter()
            .chain(old.into_iter().map(|(k, v)| (k, Some(v))))
            .filter(|(k, _)| seen.insert(k.clone()))
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        merged.sort_by(|a, b| a.0.cmp(&b.0));
        self.entries = merged;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, KanaOutput)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&KanaOutput> {
        self.entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    /// Match pending input, preferring to wait while a longer key is possible.
    pub fn match_keys(&self, pending: &str) -> MatchResult<'_> {
        if pending.is_empty() {
            return MatchResult::NoMatch;
        }
        if self.has_extension(pending) {
            return MatchResult::PartialMatch;
        }
        self.match_forced(pending)
    }

    /// Longest key that is a prefix of `pending`, ignoring longer keys.
    pub fn match_forced(&self, pending: &str) -> MatchResult<'_> {
        let ends = pending
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .rev();
        for end in ends {
            if let Some(output) = self.get(&pending[..end]) {
                return MatchResult::Match {
                    output,
                    consumed: end,
                };
            }
        }
        MatchResult::NoMatch
    }

    /// Whether some key strictly extends `pending`.
    ///
    /// Keys sharing a prefix are contiguous in sorted order, so only the
    /// first key greater than `pending` needs checking.
    fn has_extension(&self, pending: &str) -> bool {
        let idx = self.entries.partition_point(|(k, _)| k.as_str() <= pending);
        self.entries
            .get(idx)
            .is_some_and(|(k, _)| k.starts_with(pending))
    }

    /// Kana entries whose key starts with `prefix`, as `(key, kana)` in table order.
    pub fn alternatives<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        let start = self.entries.partition_point(|(k, _)| k.as_str() < prefix);
        self.entries[start..]
            .iter()
            .take_while(move |(k, _)| k.starts_with(prefix))
            .filter_map(|(k, out)| match out {
                KanaOutput::Kana { kana, .. } => Some((k.as_str(), kana.as_str())),
                KanaOutput::Action(_) => None,
            })
    }
}
