use std::sync::{Arc, OnceLock, RwLock};

use tracing::{debug, debug_span, warn};

use skk_core::dict::{CompletionData, DictionaryStore, HenkanType, StoreStatus};
use skk_core::kana::{parse_kana_toml, Function, KanaTables};
use skk_core::settings::Settings;
use skk_session::{normalize, Host, InputSession, InputState, KeyMaps, LastCandidate, SessionError};

use super::{EngineError, HostStatus};

/// Returned when a mode change produced no text, so the host still redraws.
pub const MODE_CHANGE_NUDGE: &str = " \x08";

/// Host-facing engine: one editing context over shared tables, keymaps and
/// a lazily opened dictionary store.
pub struct Engine {
    settings: Arc<Settings>,
    tables: Arc<RwLock<KanaTables>>,
    keymaps: Arc<RwLock<KeyMaps>>,
    store: OnceLock<Arc<DictionaryStore>>,
    session: Option<InputSession>,
}

impl Engine {
    /// Build the kana tables (including configured table files). The
    /// dictionary store is opened on first use.
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        let mut tables = KanaTables::new();
        let files = settings.dictionary.kana_table_files();
        if !files.is_empty() {
            tables.load_files(&files)?;
        }
        tables.get(&settings.input.kana_table)?;
        Ok(Self {
            settings: Arc::new(settings),
            tables: Arc::new(RwLock::new(tables)),
            keymaps: Arc::new(RwLock::new(KeyMaps::default())),
            store: OnceLock::new(),
            session: None,
        })
    }

    /// Use an already opened store instead of the configured sources.
    pub fn with_store(settings: Settings, store: Arc<DictionaryStore>) -> Result<Self, EngineError> {
        let engine = Self::new(settings)?;
        let _ = engine.store.set(store);
        Ok(engine)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<DictionaryStore> {
        self.store
            .get_or_init(|| Arc::new(DictionaryStore::from_settings(&self.settings)))
    }

    fn session_mut(&mut self) -> &mut InputSession {
        let store = Arc::clone(self.store());
        let settings = Arc::clone(&self.settings);
        let tables = Arc::clone(&self.tables);
        let keymaps = Arc::clone(&self.keymaps);
        self.session.get_or_insert_with(move || {
            let mut session = InputSession::new(settings, tables, keymaps, store);
            session.set_enabled(false);
            session
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.session.as_ref().is_some_and(InputSession::is_enabled)
    }

    fn is_busy(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.state().is_idle())
    }

    /// Turn conversion on. In replace mode the host is told and nothing
    /// happens. With a pending key while input is in progress, the key is
    /// handled instead.
    pub fn enable(
        &mut self,
        key: Option<&str>,
        status: &HostStatus,
        host: &mut dyn Host,
    ) -> Result<String, EngineError> {
        if status.mode == "R" {
            host.message("skk: not available in replace mode");
            return Ok(String::new());
        }
        if let Some(key) = key.filter(|_| self.is_busy()) {
            return self.handle(key, status, host);
        }
        if self.is_enabled() {
            return Ok(String::new());
        }
        debug!("enable");
        self.session_mut().enable();
        Ok(String::new())
    }

    /// Commit pending input and turn conversion off.
    pub fn disable(
        &mut self,
        key: Option<&str>,
        status: &HostStatus,
        host: &mut dyn Host,
    ) -> Result<String, EngineError> {
        if let Some(key) = key.filter(|_| self.is_busy()) {
            return self.handle(key, status, host);
        }
        debug!("disable");
        let session = self.session_mut();
        session.call(&Function::Disable, "", host)?;
        Ok(session.output())
    }

    pub fn toggle(
        &mut self,
        key: Option<&str>,
        status: &HostStatus,
        host: &mut dyn Host,
    ) -> Result<String, EngineError> {
        if self.is_enabled() {
            self.disable(key, status, host)
        } else {
            self.enable(key, status, host)
        }
    }

    /// Process one key and return the literal edit for the host.
    pub fn handle(
        &mut self,
        key: &str,
        status: &HostStatus,
        host: &mut dyn Host,
    ) -> Result<String, EngineError> {
        let _span = debug_span!("engine_handle", key).entered();
        self.run(key, status, host, |s, host| s.handle_key(key, host))
    }

    /// Run the function named `function` as if `key` were bound to it.
    pub fn call(
        &mut self,
        function: &str,
        key: &str,
        status: &HostStatus,
        host: &mut dyn Host,
    ) -> Result<String, EngineError> {
        let func: Function = match function.parse() {
            Ok(f) => f,
            Err(e) => {
                host.message(&format!("skk: {e}"));
                return Err(e.into());
            }
        };
        let _span = debug_span!("engine_call", %func, key).entered();
        self.run(key, status, host, |s, host| s.call(&func, key, host))
    }

    fn run(
        &mut self,
        key: &str,
        status: &HostStatus,
        host: &mut dyn Host,
        f: impl FnOnce(&mut InputSession, &mut dyn Host) -> Result<(), SessionError>,
    ) -> Result<String, EngineError> {
        let egg_like_newline = self.settings.input.egg_like_newline;
        let session = self.session_mut();
        session.set_host_mode(&status.mode);

        let info = status.complete_info;
        if info.pum_visible
            && egg_like_newline
            && info.selected >= 0
            && normalize(key) == "<cr>"
        {
            debug!(complete_type = %status.complete_type, "confirming completion");
            session.reset();
            return Ok(status.complete_type.confirm_sequence().to_string());
        }

        // The buffer moved under us (completion, cursor motion): start over.
        if !status.prev_input.ends_with(&session.display()) {
            debug!(prev_input = %status.prev_input, "pre-edit out of sync, resetting");
            session.reset();
        }

        let before = session.mode_name();
        f(session, host)?;
        let output = session.output();
        if output.is_empty() && before != session.mode_name() {
            return Ok(MODE_CHANGE_NUDGE.to_string());
        }
        Ok(output)
    }

    /// Drop all input state (e.g. when the host leaves insert mode).
    pub fn reset(&mut self) {
        if let Some(session) = &mut self.session {
            session.reset();
        }
    }

    pub fn pre_edit(&self) -> String {
        self.session
            .as_ref()
            .map(InputSession::display)
            .unwrap_or_default()
    }

    /// Pre-edit length in characters.
    pub fn pre_edit_length(&self) -> usize {
        self.pre_edit().chars().count()
    }

    /// Headword being composed, for completion sources.
    pub fn prefix(&self) -> String {
        self.session
            .as_ref()
            .map(|s| s.prefix().to_string())
            .unwrap_or_default()
    }

    pub fn mode_name(&self) -> &'static str {
        self.session
            .as_ref()
            .map(InputSession::mode_name)
            .unwrap_or("hira")
    }

    /// Completion candidates for the headword being composed.
    pub fn candidates(&self) -> CompletionData {
        let Some(session) = &self.session else {
            return CompletionData::new();
        };
        let InputState::Composing(comp) = session.state() else {
            return CompletionData::new();
        };
        if comp.abbrev || comp.okuri_feed.is_some() {
            return CompletionData::new();
        }
        let tables = self.tables.read().unwrap();
        match tables.get(session.kana_table()) {
            Ok(table) => self
                .store()
                .completion(&comp.henkan_feed, &comp.feed, table),
            Err(e) => {
                warn!(error = %e, "kana table vanished");
                CompletionData::new()
            }
        }
    }

    /// `(candidate, rank)` pairs for the headword being composed.
    pub fn ranks(&self) -> Vec<(String, u64)> {
        let prefix = self.prefix();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.store().ranks(&prefix)
    }

    /// A completion item was accepted: learn it like a conversion.
    pub fn complete_callback(&mut self, kana: &str, word: &str) {
        debug!(kana, word, "completion accepted");
        self.store().register(HenkanType::OkuriNasi, kana, word);
        self.session_mut().set_last_candidate(LastCandidate {
            kind: HenkanType::OkuriNasi,
            word: kana.to_string(),
            candidate: word.to_string(),
        });
    }

    pub fn last_candidate(&self) -> Option<&LastCandidate> {
        self.session.as_ref().and_then(InputSession::last_candidate)
    }

    /// Merge TOML `table` into the named kana table.
    pub fn register_kana_table(&self, name: &str, table: &str, create: bool) -> Result<(), EngineError> {
        let entries = parse_kana_toml(table)?;
        self.tables.write().unwrap().register(name, entries, create)?;
        Ok(())
    }

    pub fn register_keymap(&self, state: &str, key: &str, function: &str) -> Result<(), EngineError> {
        self.keymaps
            .write()
            .unwrap()
            .register(state, key, function)?;
        Ok(())
    }

    /// Persist the user dictionary and ranks if the store was ever opened.
    pub fn save(&self) -> Result<(), EngineError> {
        if let Some(store) = self.store.get() {
            store.save()?;
        }
        Ok(())
    }

    /// Outcome of the most recent registration.
    pub fn status(&self) -> StoreStatus {
        self.store.get().map(|s| s.status()).unwrap_or_default()
    }
}
