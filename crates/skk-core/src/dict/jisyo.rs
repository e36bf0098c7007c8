use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::{DictError, Dictionary, HenkanType};
use crate::encoding::TextEncoding;

const OKURI_ARI_MARKER: &str = ";; okuri-ari entries.";
const OKURI_NASI_MARKER: &str = ";; okuri-nasi entries.";

/// An SKK dictionary (`headword /cand1/cand2/` lines) held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkkJisyo {
    okuri_ari: BTreeMap<String, Vec<String>>,
    okuri_nasi: BTreeMap<String, Vec<String>>,
}

impl SkkJisyo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse dictionary text. Lines that are neither entries nor section
    /// markers are skipped. Before any marker, entries are classified by
    /// their headword.
    pub fn parse(text: &str) -> Self {
        let mut jisyo = Self::new();
        let mut section: Option<HenkanType> = None;
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.starts_with(OKURI_ARI_MARKER) {
                section = Some(HenkanType::OkuriAri);
                continue;
            }
            if line.starts_with(OKURI_NASI_MARKER) {
                section = Some(HenkanType::OkuriNasi);
                continue;
            }
            if line.starts_with(';') || line.trim().is_empty() {
                continue;
            }
            let Some((word, candidates)) = parse_line(line) else {
                debug!(line, "skipping malformed jisyo line");
                continue;
            };
            let kind = section.unwrap_or_else(|| classify(&word));
            let entry = jisyo.table_mut(kind).entry(word).or_default();
            for c in candidates {
                if !entry.contains(&c) {
                    entry.push(c);
                }
            }
        }
        jisyo
    }

    pub fn load(path: &Path, encoding: TextEncoding) -> Result<Self, DictError> {
        let bytes = std::fs::read(path).map_err(|e| DictError::io(path, e))?;
        let jisyo = Self::parse(&encoding.decode(&bytes));
        debug!(path = %path.display(), headwords = jisyo.len(), "loaded jisyo");
        Ok(jisyo)
    }

    pub fn get(&self, kind: HenkanType, word: &str) -> Option<&[String]> {
        self.table(kind).get(word).map(Vec::as_slice)
    }

    /// Put `candidate` at the front of `word`'s list, moving it if present.
    /// Returns `false` when it was already first.
    pub fn insert_front(&mut self, kind: HenkanType, word: &str, candidate: &str) -> bool {
        let entry = self.table_mut(kind).entry(word.to_string()).or_default();
        if entry.first().map(String::as_str) == Some(candidate) {
            return false;
        }
        entry.retain(|c| c != candidate);
        entry.insert(0, candidate.to_string());
        true
    }

    /// Remove one candidate; the headword disappears with its last candidate.
    pub fn remove(&mut self, kind: HenkanType, word: &str, candidate: &str) -> bool {
        let table = self.table_mut(kind);
        let Some(entry) = table.get_mut(word) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|c| c != candidate);
        let removed = entry.len() < before;
        if entry.is_empty() {
            table.remove(word);
        }
        removed
    }

    pub fn entries(&self, kind: HenkanType) -> impl Iterator<Item = (&str, &[String])> {
        self.table(kind)
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of headwords across both partitions.
    pub fn len(&self) -> usize {
        self.okuri_ari.len() + self.okuri_nasi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize in SKK layout: okuri-ari section (descending), then
    /// okuri-nasi section (ascending).
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(OKURI_ARI_MARKER);
        out.push('\n');
        for (word, candidates) in self.okuri_ari.iter().rev() {
            push_line(&mut out, word, candidates);
        }
        out.push_str(OKURI_NASI_MARKER);
        out.push('\n');
        for (word, candidates) in &self.okuri_nasi {
            push_line(&mut out, word, candidates);
        }
        out
    }

    fn table(&self, kind: HenkanType) -> &BTreeMap<String, Vec<String>> {
        match kind {
            HenkanType::OkuriAri => &self.okuri_ari,
            HenkanType::OkuriNasi => &self.okuri_nasi,
        }
    }

    fn table_mut(&mut self, kind: HenkanType) -> &mut BTreeMap<String, Vec<String>> {
        match kind {
            HenkanType::OkuriAri => &mut self.okuri_ari,
            HenkanType::OkuriNasi => &mut self.okuri_nasi,
        }
    }
}

impl Dictionary for SkkJisyo {
    fn lookup(&self, kind: HenkanType, word: &str) -> Vec<String> {
        self.get(kind, word).map(<[String]>::to_vec).unwrap_or_default()
    }

    fn midashis(&self, prefix: &str) -> Vec<String> {
        self.okuri_nasi
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

fn push_line(out: &mut String, word: &str, candidates: &[String]) {
    if candidates.is_empty() {
        return;
    }
    out.push_str(word);
    out.push_str(" /");
    for c in candidates {
        out.push_str(c);
        out.push('/');
    }
    out.push('\n');
}

/// Split `word /c1/c2/` into headword and candidates. Okuri blocks
/// (`/[る/送/]/`) are dropped; their candidates repeat the plain ones.
fn parse_line(line: &str) -> Option<(String, Vec<String>)> {
    let (word, rest) = line.split_once(' ')?;
    let rest = rest.trim();
    if word.is_empty() || !rest.starts_with('/') {
        return None;
    }
    let mut in_block = false;
    let mut candidates = Vec::new();
    for field in rest.split('/') {
        if field.is_empty() {
            continue;
        }
        if field.starts_with('[') {
            in_block = true;
            continue;
        }
        if in_block {
            if field == "]" {
                in_block = false;
            }
            continue;
        }
        candidates.push(field.to_string());
    }
    Some((word.to_string(), candidates))
}

/// Headwords like `おくr` (kana followed by one ASCII lowercase letter) are okuri-ari.
pub fn classify(word: &str) -> HenkanType {
    let mut chars = word.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(last), Some(prev)) if last.is_ascii_lowercase() && !prev.is_ascii() => {
            HenkanType::OkuriAri
        }
        _ => HenkanType::OkuriNasi,
    }
}
