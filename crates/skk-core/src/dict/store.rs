use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use tracing::{debug, debug_span, warn};

use super::{
    is_storable_candidate, is_storable_headword, DictError, Dictionary, HenkanType, RankTable,
    ServerOptions, SkkJisyo, SkkServer, UserDictionary,
};
use crate::encoding::TextEncoding;
use crate::kana::KanaTable;
use crate::settings::Settings;

/// `(headword, candidates)` pairs offered for completion.
pub type CompletionData = Vec<(String, Vec<String>)>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreStatus {
    #[default]
    Ok,
    /// The last persistence attempt failed; the message is kept for the host.
    RegistrationFailed(String),
}

/// Where the store's sources live.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub global: Vec<(PathBuf, TextEncoding)>,
    pub user: Option<(PathBuf, TextEncoding)>,
    pub rank_file: Option<PathBuf>,
    pub server: Option<ServerOptions>,
    /// Persist after every registration instead of only on `save()`.
    pub immediately_save: bool,
}

impl StoreOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let dict = &settings.dictionary;
        Self {
            global: dict.global_dictionaries(),
            user: dict
                .user_dictionary_path()
                .map(|p| (p, dict.user_dictionary_encoding)),
            rank_file: dict.rank_file_path(),
            server: settings
                .server
                .enabled
                .then(|| ServerOptions::from(&settings.server)),
            immediately_save: dict.immediately_dictionary_rw,
        }
    }
}

/// Merged view over user, global and server dictionaries.
pub struct DictionaryStore {
    user: UserDictionary,
    global: Vec<SkkJisyo>,
    server: Option<SkkServer>,
    ranks: RwLock<RankTable>,
    rank_file: Option<PathBuf>,
    immediately_save: bool,
    status: Mutex<StoreStatus>,
}

impl DictionaryStore {
    pub fn new(user: UserDictionary, global: Vec<SkkJisyo>) -> Self {
        Self {
            user,
            global,
            server: None,
            ranks: RwLock::new(RankTable::new()),
            rank_file: None,
            immediately_save: false,
            status: Mutex::new(StoreStatus::Ok),
        }
    }

    pub fn with_server(mut self, server: SkkServer) -> Self {
        self.server = Some(server);
        self
    }

    pub fn with_ranks(mut self, ranks: RankTable, rank_file: Option<PathBuf>) -> Self {
        self.ranks = RwLock::new(ranks);
        self.rank_file = rank_file;
        self
    }

    pub fn immediately_save(mut self, enabled: bool) -> Self {
        self.immediately_save = enabled;
        self
    }

    /// Load every configured source. Unreadable files are logged and
    /// skipped so a broken dictionary never prevents input.
    pub fn open(opts: &StoreOptions) -> Self {
        let _span = debug_span!("store_open").entered();
        let global = opts
            .global
            .iter()
            .filter_map(|(path, enc)| match SkkJisyo::load(path, *enc) {
                Ok(j) => Some(j),
                Err(e) => {
                    warn!(error = %e, "skipping global dictionary");
                    None
                }
            })
            .collect();
        let user = match &opts.user {
            Some((path, enc)) => UserDictionary::open(path, *enc).unwrap_or_else(|e| {
                warn!(error = %e, "user dictionary unreadable, starting empty");
                UserDictionary::new()
            }),
            None => UserDictionary::new(),
        };
        let ranks = match &opts.rank_file {
            Some(path) => RankTable::open(path).unwrap_or_else(|e| {
                warn!(error = %e, "rank file unreadable, starting empty");
                RankTable::new()
            }),
            None => RankTable::new(),
        };
        let mut store = Self::new(user, global)
            .with_ranks(ranks, opts.rank_file.clone())
            .immediately_save(opts.immediately_save);
        if let Some(server_opts) = &opts.server {
            let server = SkkServer::new(server_opts.clone());
            if let Err(e) = server.connect() {
                warn!(error = %e, "skkserv not reachable, will retry on lookup");
            }
            store.server = Some(server);
        }
        store
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::open(&StoreOptions::from_settings(settings))
    }

    pub fn user_dictionary(&self) -> &UserDictionary {
        &self.user
    }

    pub fn server(&self) -> Option<&SkkServer> {
        self.server.as_ref()
    }

    /// Candidates for `word`: user, then global, then server, with ranked
    /// candidates moved to the front (highest rank first).
    pub fn lookup(&self, kind: HenkanType, word: &str) -> Vec<String> {
        let _span = debug_span!("lookup", %kind, word).entered();
        let server = match &self.server {
            Some(s) => s.lookup(word),
            None => Vec::new(),
        };
        let result = self.merge(word, self.lookup_local(kind, word), server);
        debug!(count = result.len(), "lookup done");
        result
    }

    fn lookup_local(&self, kind: HenkanType, word: &str) -> Vec<String> {
        let mut all = self.user.lookup(kind, word);
        for dict in &self.global {
            all.extend(dict.lookup(kind, word));
        }
        all
    }

    fn merge(&self, word: &str, local: Vec<String>, server: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut merged: Vec<String> = local
            .into_iter()
            .chain(server)
            .filter(|c| seen.insert(c.clone()))
            .collect();
        let ranks = self.ranks.read().unwrap();
        // Stable: unranked candidates keep their source order.
        merged.sort_by_key(|c| std::cmp::Reverse(ranks.get(word, c).unwrap_or(0)));
        merged
    }

    /// Record a commit: promote in the user dictionary and bump the rank.
    /// Persistence failures are reported through [`status`](Self::status).
    pub fn register(&self, kind: HenkanType, word: &str, candidate: &str) {
        if !is_storable_headword(word) || !is_storable_candidate(candidate) {
            warn!(word, candidate, "refusing to register candidate");
            self.set_status(StoreStatus::RegistrationFailed(format!(
                "cannot register {candidate:?} for {word:?}"
            )));
            return;
        }
        self.user.register(kind, word, candidate);
        let rank = self.ranks.write().unwrap().bump(word, candidate);
        debug!(%kind, word, candidate, rank, "registered");
        if self.immediately_save {
            self.persist();
        }
    }

    pub fn purge(&self, kind: HenkanType, word: &str, candidate: &str) {
        let removed = self.user.purge(kind, word, candidate);
        self.ranks.write().unwrap().remove(word, candidate);
        debug!(%kind, word, candidate, removed, "purged");
        if self.immediately_save {
            self.persist();
        }
    }

    /// Okuri-nasi headwords starting with `prefix` (expanded by the pending
    /// romaji `feed`), each with its merged candidates.
    pub fn completion(&self, prefix: &str, feed: &str, table: &KanaTable) -> CompletionData {
        let _span = debug_span!("completion", prefix, feed).entered();
        let prefixes: Vec<String> = if feed.is_empty() {
            vec![prefix.to_string()]
        } else {
            table
                .alternatives(feed)
                .map(|(_, kana)| format!("{prefix}{kana}"))
                .collect()
        };

        let mut headwords: Vec<String> = Vec::new();
        for p in &prefixes {
            headwords.extend(self.user.midashis(p));
            for dict in &self.global {
                headwords.extend(dict.midashis(p));
            }
        }
        let server_results = match &self.server {
            Some(s) => s.completion(prefix, feed, table),
            None => Vec::new(),
        };

        let mut seen = HashSet::new();
        let mut out = CompletionData::new();
        for word in headwords {
            if seen.insert(word.clone()) {
                let local = self.lookup_local(HenkanType::OkuriNasi, &word);
                let server = server_results
                    .iter()
                    .find(|(w, _)| *w == word)
                    .map(|(_, c)| c.clone())
                    .unwrap_or_default();
                out.push((word.clone(), self.merge(&word, local, server)));
            }
        }
        for (word, server) in server_results {
            if seen.insert(word.clone()) {
                let local = self.lookup_local(HenkanType::OkuriNasi, &word);
                out.push((word.clone(), self.merge(&word, local, server)));
            }
        }
        out
    }

    /// `(candidate, rank)` for headwords starting with `prefix`, highest first.
    pub fn ranks(&self, prefix: &str) -> Vec<(String, u64)> {
        self.ranks.read().unwrap().with_prefix(prefix)
    }

    /// Persist the user dictionary and rank file.
    pub fn save(&self) -> Result<(), DictError> {
        self.user.save()?;
        if let Some(path) = &self.rank_file {
            self.ranks.read().unwrap().save(path)?;
        }
        Ok(())
    }

    pub fn status(&self) -> StoreStatus {
        self.status.lock().unwrap().clone()
    }

    fn persist(&self) {
        match self.save() {
            Ok(()) => self.set_status(StoreStatus::Ok),
            Err(e) => {
                warn!(error = %e, "failed to persist dictionary");
                self.set_status(StoreStatus::RegistrationFailed(e.to_string()));
            }
        }
    }

    fn set_status(&self, status: StoreStatus) {
        *self.status.lock().unwrap() = status;
    }
}
