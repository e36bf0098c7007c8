//! User dictionary with runtime word registration.
//!
//! Wraps an `SkkJisyo` in a `RwLock` so registration can happen while
//! sessions hold a shared reference to the store.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use super::rank::write_atomic;
use super::{DictError, Dictionary, HenkanType, SkkJisyo};
use crate::encoding::TextEncoding;

pub struct UserDictionary {
    jisyo: RwLock<SkkJisyo>,
    path: Option<PathBuf>,
    encoding: TextEncoding,
}

impl UserDictionary {
    /// In-memory dictionary that is never persisted.
    pub fn new() -> Self {
        Self {
            jisyo: RwLock::new(SkkJisyo::new()),
            path: None,
            encoding: TextEncoding::Utf8,
        }
    }

    pub fn from_jisyo(jisyo: SkkJisyo) -> Self {
        Self {
            jisyo: RwLock::new(jisyo),
            ..Self::new()
        }
    }

    /// Open from file, returning an empty dictionary bound to `path` if the
    /// file doesn't exist.
    pub fn open(path: &Path, encoding: TextEncoding) -> Result<Self, DictError> {
        let jisyo = match std::fs::read(path) {
            Ok(bytes) => SkkJisyo::parse(&encoding.decode(&bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => SkkJisyo::new(),
            Err(e) => return Err(DictError::io(path, e)),
        };
        debug!(path = %path.display(), headwords = jisyo.len(), "opened user dictionary");
        Ok(Self {
            jisyo: RwLock::new(jisyo),
            path: Some(path.to_path_buf()),
            encoding,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register a word at the front of its candidate list.
    /// Returns `false` if it was already first.
    pub fn register(&self, kind: HenkanType, word: &str, candidate: &str) -> bool {
        self.jisyo.write().unwrap().insert_front(kind, word, candidate)
    }

    /// Unregister a word. Returns `true` if removed, `false` if not found.
    pub fn purge(&self, kind: HenkanType, word: &str, candidate: &str) -> bool {
        self.jisyo.write().unwrap().remove(kind, word, candidate)
    }

    /// List all entries of one partition as (headword, candidates), sorted by headword.
    pub fn list(&self, kind: HenkanType) -> Vec<(String, Vec<String>)> {
        self.jisyo
            .read()
            .unwrap()
            .entries(kind)
            .map(|(w, c)| (w.to_string(), c.to_vec()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.jisyo.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persist to the bound path. Dictionaries without a path are not saved.
    pub fn save(&self) -> Result<(), DictError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = self.jisyo.read().unwrap().to_text();
        write_atomic(path, &self.encoding.encode(&text))
    }
}

impl Default for UserDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for UserDictionary {
    fn lookup(&self, kind: HenkanType, word: &str) -> Vec<String> {
        self.jisyo.read().unwrap().lookup(kind, word)
    }

    fn midashis(&self, prefix: &str) -> Vec<String> {
        self.jisyo.read().unwrap().midashis(prefix)
    }
}
