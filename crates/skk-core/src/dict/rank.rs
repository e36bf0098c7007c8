//! Usage ranks for committed candidates.
//!
//! Each commit stamps `(headword, candidate)` with the next sequence number,
//! so the most recently committed candidate always has the highest rank.
//! Persisted as `headword<TAB>candidate<TAB>rank` lines.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::DictError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankTable {
    ranks: HashMap<String, HashMap<String, u64>>,
    last: u64,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the pair with the next sequence number and return it.
    pub fn bump(&mut self, word: &str, candidate: &str) -> u64 {
        self.last += 1;
        self.ranks
            .entry(word.to_string())
            .or_default()
            .insert(candidate.to_string(), self.last);
        self.last
    }

    pub fn get(&self, word: &str, candidate: &str) -> Option<u64> {
        self.ranks.get(word)?.get(candidate).copied()
    }

    pub fn remove(&mut self, word: &str, candidate: &str) -> bool {
        let Some(cands) = self.ranks.get_mut(word) else {
            return false;
        };
        let removed = cands.remove(candidate).is_some();
        if cands.is_empty() {
            self.ranks.remove(word);
        }
        removed
    }

    /// `(candidate, rank)` for every headword starting with `prefix`,
    /// highest rank first.
    pub fn with_prefix(&self, prefix: &str) -> Vec<(String, u64)> {
        let mut out: Vec<(String, u64)> = self
            .ranks
            .iter()
            .filter(|(word, _)| word.starts_with(prefix))
            .flat_map(|(_, cands)| cands.iter().map(|(c, r)| (c.clone(), *r)))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    pub fn len(&self) -> usize {
        self.ranks.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Read rank lines. Malformed lines are skipped so one bad entry
    /// cannot cost every other rank.
    pub fn parse(text: &str, path: &Path) -> Self {
        let mut table = Self::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(word), Some(candidate), Some(rank), None) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                debug!(path = %path.display(), line = i + 1, "skipping malformed rank line");
                continue;
            };
            let Ok(rank) = rank.trim().parse::<u64>() else {
                debug!(path = %path.display(), line = i + 1, rank, "skipping invalid rank");
                continue;
            };
            table
                .ranks
                .entry(word.to_string())
                .or_default()
                .insert(candidate.to_string(), rank);
            table.last = table.last.max(rank);
        }
        table
    }

    pub fn to_text(&self) -> String {
        let mut lines: Vec<(&str, &str, u64)> = self
            .ranks
            .iter()
            .flat_map(|(w, cands)| cands.iter().map(move |(c, r)| (w.as_str(), c.as_str(), *r)))
            .collect();
        lines.sort_by_key(|&(_, _, r)| r);
        let mut out = String::new();
        for (w, c, r) in lines {
            out.push_str(&format!("{w}\t{c}\t{r}\n"));
        }
        out
    }

    /// Open from file, returning an empty table if the file doesn't exist.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text, path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(DictError::io(path, e)),
        }
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        write_atomic(path, self.to_text().as_bytes())
    }
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DictError> {
    let tmp = path.with_extension("tmp");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DictError::io(parent, e))?;
    }
    fs::write(&tmp, bytes).map_err(|e| DictError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| DictError::io(path, e))?;
    Ok(())
}
