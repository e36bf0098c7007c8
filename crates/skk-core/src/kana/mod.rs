//! Kana tables and the incremental romaji matcher.
//!
//! A table maps input keys to either literal kana (with an optional tail that
//! is fed back into the matcher, e.g. `kk` → `っ` + `k`) or an engine
//! [`Function`]. Tables are registered by name; `rom` and `zen` are built in.

mod config;
mod function;
mod table;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::encoding::TextEncoding;
use crate::unicode::to_zenkaku;

pub use config::{load_kana_file, parse_kana_lines, parse_kana_toml};
pub use function::Function;
pub use table::{KanaTable, MatchResult};

pub const DEFAULT_TOML: &str = include_str!("default_romaji.toml");

pub const ROM_TABLE: &str = "rom";
pub const ZEN_TABLE: &str = "zen";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KanaOutput {
    Kana { kana: String, tail: String },
    Action(Function),
}

impl KanaOutput {
    pub fn kana(kana: impl Into<String>) -> Self {
        KanaOutput::Kana {
            kana: kana.into(),
            tail: String::new(),
        }
    }
}

/// A table entry as supplied for registration; `None` deletes the key.
pub type KanaEntry = (String, Option<KanaOutput>);

#[derive(Debug, thiserror::Error)]
pub enum KanaError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("table {0} is not found")]
    UnknownTable(String),
    #[error("function not found: {0}")]
    UnknownFunction(String),
    #[error("illegal result for key {key:?}: {value}")]
    IllegalKanaResult { key: String, value: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The named tables known to the engine.
#[derive(Debug, Clone)]
pub struct KanaTables {
    tables: HashMap<String, KanaTable>,
}

impl Default for KanaTables {
    fn default() -> Self {
        let mut tables = HashMap::new();
        tables.insert(ROM_TABLE.to_string(), default_rom_table());
        tables.insert(ZEN_TABLE.to_string(), zen_table());
        Self { tables }
    }
}

impl KanaTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<&KanaTable, KanaError> {
        self.tables
            .get(name)
            .ok_or_else(|| KanaError::UnknownTable(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Merge `entries` over the table `name`.
    ///
    /// Unknown names fail with [`KanaError::UnknownTable`] unless `create`
    /// is set, in which case a new table is started.
    pub fn register(
        &mut self,
        name: &str,
        entries: Vec<KanaEntry>,
        create: bool,
    ) -> Result<(), KanaError> {
        debug!(name, count = entries.len(), create, "register kana table");
        match self.tables.get_mut(name) {
            Some(table) => table.merge(entries),
            None if create => {
                self.tables
                    .insert(name.to_string(), KanaTable::from_entries(entries));
            }
            None => return Err(KanaError::UnknownTable(name.to_string())),
        }
        Ok(())
    }

    /// Load `from,result` kana files and merge them into the `rom` table.
    pub fn load_files<P: AsRef<Path>>(
        &mut self,
        files: &[(P, TextEncoding)],
    ) -> Result<(), KanaError> {
        let mut entries = Vec::new();
        for (path, encoding) in files {
            entries.extend(load_kana_file(path.as_ref(), *encoding)?);
        }
        self.register(ROM_TABLE, entries, false)
    }
}

fn default_rom_table() -> KanaTable {
    let entries = parse_kana_toml(DEFAULT_TOML).expect("default romaji TOML must be valid");
    KanaTable::from_entries(entries)
}

/// Printable ASCII mapped to full-width forms.
fn zen_table() -> KanaTable {
    let entries = (' '..='~')
        .map(|c| {
            (
                c.to_string(),
                Some(KanaOutput::kana(to_zenkaku(c).to_string())),
            )
        })
        .collect();
    KanaTable::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables() {
        let tables = KanaTables::new();
        assert_eq!(tables.names(), vec!["rom", "zen"]);
        let rom = tables.get(ROM_TABLE).unwrap();
        assert_eq!(rom.get("ka"), Some(&KanaOutput::kana("か")));
        let zen = tables.get(ZEN_TABLE).unwrap();
        assert_eq!(zen.get("a"), Some(&KanaOutput::kana("ａ")));
        assert_eq!(zen.get(" "), Some(&KanaOutput::kana("\u{3000}")));
    }

    #[test]
    fn register_unknown_without_create() {
        let mut tables = KanaTables::new();
        let err = tables
            .register("mine", vec![("a".into(), Some(KanaOutput::kana("ア")))], false)
            .unwrap_err();
        assert!(matches!(err, KanaError::UnknownTable(ref n) if n == "mine"));
        assert!(!tables.contains("mine"));
    }

    #[test]
    fn register_creates_table() {
        let mut tables = KanaTables::new();
        tables
            .register("mine", vec![("a".into(), Some(KanaOutput::kana("ア")))], true)
            .unwrap();
        assert_eq!(
            tables.get("mine").unwrap().get("a"),
            Some(&KanaOutput::kana("ア"))
        );
    }

    #[test]
    fn register_replaces_and_deletes() {
        let mut tables = KanaTables::new();
        tables
            .register(
                ROM_TABLE,
                vec![
                    ("ka".into(), Some(KanaOutput::kana("カ"))),
                    ("ki".into(), None),
                ],
                false,
            )
            .unwrap();
        let rom = tables.get(ROM_TABLE).unwrap();
        assert_eq!(rom.get("ka"), Some(&KanaOutput::kana("カ")));
        assert_eq!(rom.get("ki"), None);
        assert_eq!(rom.get("ku"), Some(&KanaOutput::kana("く")));
    }

    #[test]
    fn load_files_into_rom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("azik.txt");
        std::fs::write(&path, "# comment\n\nkf,き\n").unwrap();
        let mut tables = KanaTables::new();
        tables
            .load_files(&[(path.as_path(), TextEncoding::Utf8)])
            .unwrap();
        assert_eq!(
            tables.get(ROM_TABLE).unwrap().get("kf"),
            Some(&KanaOutput::kana("き"))
        );
    }
}
