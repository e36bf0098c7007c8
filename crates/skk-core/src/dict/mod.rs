//! Dictionary sources and the merged candidate store.
//!
//! `SkkJisyo` holds SKK-format dictionaries in memory, `UserDictionary` wraps
//! one for runtime registration, `RankTable` tracks usage ranks and
//! `SkkServer` speaks the skkserv protocol. `DictionaryStore` merges them.

mod jisyo;
mod rank;
pub mod server;
mod store;
#[cfg(test)]
mod tests;
mod user;

pub use jisyo::{classify, SkkJisyo};
pub use rank::RankTable;
pub use server::{ServerOptions, SkkServer};
pub use store::{CompletionData, DictionaryStore, StoreOptions, StoreStatus};
pub use user::UserDictionary;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use crate::encoding::UnknownEncoding;

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Encoding(#[from] UnknownEncoding),
}

impl DictError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DictError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Dictionary partition a headword belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HenkanType {
    /// Headword ends with an okuri consonant, e.g. `おくr`.
    OkuriAri,
    OkuriNasi,
}

impl fmt::Display for HenkanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HenkanType::OkuriAri => "okuri-ari",
            HenkanType::OkuriNasi => "okuri-nasi",
        })
    }
}

impl FromStr for HenkanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "okuri-ari" | "okuriari" | "ari" => Ok(HenkanType::OkuriAri),
            "okuri-nasi" | "okurinasi" | "nasi" => Ok(HenkanType::OkuriNasi),
            _ => Err(format!("unknown henkan type: {s}")),
        }
    }
}

pub trait Dictionary: Send + Sync {
    fn lookup(&self, kind: HenkanType, word: &str) -> Vec<String>;

    /// Okuri-nasi headwords beginning with `prefix`, in headword order.
    fn midashis(&self, prefix: &str) -> Vec<String>;
}

/// Candidate text without its `;annotation`.
pub fn strip_annotation(candidate: &str) -> &str {
    match candidate.find(';') {
        Some(i) => &candidate[..i],
        None => candidate,
    }
}

/// Candidates must fit between `/` separators on a single jisyo line and in
/// one tab-separated rank field.
pub fn is_storable_candidate(candidate: &str) -> bool {
    !candidate.is_empty() && !candidate.contains(['/', '\n', '\r', '\t'])
}

/// Headwords end at the first space of a jisyo line and must fit in one
/// tab-separated rank field.
pub fn is_storable_headword(word: &str) -> bool {
    !word.is_empty() && !word.contains([' ', '\t', '\n', '\r'])
}
