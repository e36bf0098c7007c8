//! Engine settings loaded from TOML.
//!
//! - `Settings::default()` parses the embedded `default_settings.toml`
//! - `parse_settings_toml` / `load_settings` read user-supplied overrides
//! - Settings are handed to sessions and stores explicitly, never read from a global

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::encoding::TextEncoding;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Number of candidates on one selection page.
pub const PAGE_SIZE: usize = 7;

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input: InputSettings,
    pub candidates: CandidateSettings,
    pub dictionary: DictionarySettings,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("settings TOML must be valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputSettings {
    pub kana_table: String,
    pub immediately_cancel: bool,
    pub immediately_okuri_convert: bool,
    pub egg_like_newline: bool,
    pub accept_illegal_result: bool,
    pub marker_henkan: String,
    pub marker_henkan_select: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSettings {
    pub show_candidates_count: usize,
    pub select_candidate_keys: String,
    pub use_popup: bool,
}

impl CandidateSettings {
    pub fn select_keys(&self) -> Vec<char> {
        self.select_candidate_keys.chars().collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySettings {
    #[serde(default)]
    pub global: Vec<FileSource>,
    pub user_dictionary: String,
    #[serde(default)]
    pub user_dictionary_encoding: TextEncoding,
    pub rank_file: String,
    pub immediately_dictionary_rw: bool,
    #[serde(default)]
    pub kana_table_files: Vec<FileSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileSource {
    pub path: String,
    #[serde(default)]
    pub encoding: TextEncoding,
}

impl FileSource {
    pub fn resolve(&self) -> (PathBuf, TextEncoding) {
        (expand_home(&self.path), self.encoding)
    }
}

impl DictionarySettings {
    pub fn user_dictionary_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.user_dictionary)
    }

    pub fn rank_file_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.rank_file)
    }

    pub fn global_dictionaries(&self) -> Vec<(PathBuf, TextEncoding)> {
        self.global.iter().map(FileSource::resolve).collect()
    }

    pub fn kana_table_files(&self) -> Vec<(PathBuf, TextEncoding)> {
        self.kana_table_files.iter().map(FileSource::resolve).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub request_encoding: TextEncoding,
    pub response_encoding: TextEncoding,
}

fn non_empty_path(path: &str) -> Option<PathBuf> {
    if path.is_empty() {
        None
    } else {
        Some(expand_home(path))
    }
}

/// Expand a leading `~` to `$HOME`. Other paths are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return PathBuf::from(path),
    };
    match std::env::var_os("HOME") {
        Some(home) => {
            let mut expanded = PathBuf::from(home);
            let rest = rest.trim_start_matches('/');
            if !rest.is_empty() {
                expanded.push(rest);
            }
            expanded
        }
        None => PathBuf::from(path),
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings_toml(&content)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_non_empty!(input.kana_table);
    check_non_empty!(input.marker_henkan);
    check_non_empty!(input.marker_henkan_select);

    check_positive!(candidates.show_candidates_count);
    let keys = s.candidates.select_keys();
    let unique: HashSet<char> = keys.iter().copied().collect();
    if keys.len() != PAGE_SIZE || unique.len() != PAGE_SIZE {
        return Err(SettingsError::InvalidValue {
            field: "candidates.select_candidate_keys".to_string(),
            reason: format!("must be {PAGE_SIZE} unique characters"),
        });
    }

    if s.server.enabled {
        check_non_empty!(server.host);
        check_positive!(server.port);
    }

    for source in s.dictionary.global.iter().chain(&s.dictionary.kana_table_files) {
        if source.path.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "dictionary".to_string(),
                reason: "file paths must not be empty".to_string(),
            });
        }
    }

    Ok(())
}
