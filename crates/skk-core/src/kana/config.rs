use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{Function, KanaEntry, KanaError, KanaOutput};
use crate::encoding::TextEncoding;

#[derive(Deserialize)]
struct KanaConfig {
    mappings: BTreeMap<String, toml::Value>,
}

/// Parse a `[mappings]` TOML table into registrable entries.
///
/// A string value names a [`Function`], an array `["kana", "tail"]` is a
/// literal (tail optional) and `false` deletes the key.
pub fn parse_kana_toml(toml_str: &str) -> Result<Vec<KanaEntry>, KanaError> {
    let config: KanaConfig =
        toml::from_str(toml_str).map_err(|e| KanaError::Parse(e.to_string()))?;
    config
        .mappings
        .into_iter()
        .map(|(key, value)| {
            let output = kana_output(&key, &value)?;
            Ok((key, output))
        })
        .collect()
}

fn kana_output(key: &str, value: &toml::Value) -> Result<Option<KanaOutput>, KanaError> {
    let illegal = || KanaError::IllegalKanaResult {
        key: key.to_string(),
        value: value.to_string(),
    };
    match value {
        toml::Value::String(name) => Ok(Some(KanaOutput::Action(name.parse::<Function>()?))),
        toml::Value::Array(items) => {
            let parts: Option<Vec<&str>> = items.iter().map(toml::Value::as_str).collect();
            match parts.as_deref() {
                Some([kana]) => Ok(Some(KanaOutput::kana(*kana))),
                Some([kana, tail]) => Ok(Some(KanaOutput::Kana {
                    kana: kana.to_string(),
                    tail: tail.to_string(),
                })),
                _ => Err(illegal()),
            }
        }
        toml::Value::Boolean(false) => Ok(None),
        _ => Err(illegal()),
    }
}

/// Parse `from,result` lines. `#` comments and blank lines are skipped.
pub fn parse_kana_lines(text: &str) -> Vec<KanaEntry> {
    text.lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .filter_map(|line| {
            let line = line.trim_end_matches('\r');
            match line.split_once(',') {
                Some((from, result)) if !from.is_empty() => {
                    Some((from.to_string(), Some(KanaOutput::kana(result))))
                }
                _ => {
                    debug!(line, "skipping malformed kana line");
                    None
                }
            }
        })
        .collect()
}

pub fn load_kana_file(path: &Path, encoding: TextEncoding) -> Result<Vec<KanaEntry>, KanaError> {
    let bytes = std::fs::read(path).map_err(|source| KanaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_kana_lines(&encoding.decode(&bytes)))
}
