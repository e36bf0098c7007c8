//! SKK conversion state machine.
//!
//! `InputSession` owns the current input state of one editing context and
//! processes each key: it resolves the key through the per-state keymap,
//! runs the bound [`Function`], and accumulates committed text. The host
//! reads back a literal edit string with [`InputSession::output`].

pub(crate) mod types;

mod commit;
mod henkan;
mod host;
mod input;
mod keymap;
mod mode;
mod notation;
mod pager;
mod preedit;

#[cfg(test)]
mod tests;

use std::sync::{Arc, RwLock};

use tracing::debug_span;

use skk_core::dict::DictionaryStore;
use skk_core::kana::{Function, KanaError, KanaTables};
use skk_core::settings::Settings;

pub use host::{Host, KeyRead, NullHost};
pub use keymap::{KeyMap, KeyMaps};
pub use notation::{key_char, normalize};
pub use pager::CandidatePager;
pub use preedit::PreEdit;
pub use types::{
    Affix, Composing, Converting, Direct, InputMode, InputState, LastCandidate, StateKind,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("state {0} is not found")]
    UnknownState(String),
    #[error("function not found: {0}")]
    UnknownFunction(String),
    #[error(transparent)]
    Kana(#[from] KanaError),
}

/// One editing context's conversion state.
pub struct InputSession {
    settings: Arc<Settings>,
    tables: Arc<RwLock<KanaTables>>,
    keymaps: Arc<RwLock<KeyMaps>>,
    store: Arc<DictionaryStore>,

    state: InputState,
    mode: InputMode,
    pre_edit: PreEdit,
    pager: CandidatePager,
    /// Table used for kana modes; wide-latin always uses `zen`.
    kana_table: String,
    /// Editor mode the keys arrive in (`i`, `c`, `R`, ...).
    host_mode: String,
    enabled: bool,
    last_candidate: Option<LastCandidate>,
}

impl InputSession {
    pub fn new(
        settings: Arc<Settings>,
        tables: Arc<RwLock<KanaTables>>,
        keymaps: Arc<RwLock<KeyMaps>>,
        store: Arc<DictionaryStore>,
    ) -> Self {
        let pager = CandidatePager::from_settings(&settings.candidates);
        let kana_table = settings.input.kana_table.clone();
        Self {
            settings,
            tables,
            keymaps,
            store,
            state: InputState::default(),
            mode: InputMode::default(),
            pre_edit: PreEdit::default(),
            pager,
            kana_table,
            host_mode: "i".to_string(),
            enabled: true,
            last_candidate: None,
        }
    }

    /// Process one key. `key` is a single character or a `<...>` notation.
    pub fn handle_key(&mut self, key: &str, host: &mut dyn Host) -> Result<(), SessionError> {
        let kind = self.state.kind();
        let func = self.keymaps.read().unwrap().resolve(kind, key);
        let _span = debug_span!("handle_key", key, ?kind, %func).entered();
        self.call(&func, key, host)
    }

    /// Run `func` as if `key` had been bound to it.
    pub fn call(&mut self, func: &Function, key: &str, host: &mut dyn Host) -> Result<(), SessionError> {
        match func {
            Function::KanaInput => self.kana_input(key, host)?,
            Function::HenkanInput => self.henkan_input(key, host)?,
            Function::KakuteiFeed => self.kakutei_feed()?,
            Function::DeleteChar => self.delete_char(host)?,
            Function::HenkanPoint => self.henkan_point(host)?,
            Function::HenkanFirst => self.henkan_first(key, host)?,
            Function::HenkanForward => self.henkan_forward(host)?,
            Function::HenkanBackward => self.henkan_backward(host)?,
            Function::PurgeCandidate => self.purge_candidate(host)?,
            Function::Kakutei => self.kakutei(host)?,
            Function::Newline => self.newline(host)?,
            Function::Cancel => self.cancel(host)?,
            Function::Disable | Function::Escape => self.disable(host)?,
            Function::Abbrev => self.abbrev()?,
            Function::Hirakana => self.hirakana(host)?,
            Function::Katakana => self.katakana(host)?,
            Function::Hankatakana => self.hankatakana(host)?,
            Function::Zenkaku => self.set_latin_mode(InputMode::WideLatin, host)?,
            Function::Latin => self.set_latin_mode(InputMode::Latin, host)?,
            Function::Upper(arg) => self.upper(arg, host)?,
        }
        Ok(())
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Mode indicator name; composing an abbreviation reports `abbrev`.
    pub fn mode_name(&self) -> &'static str {
        match &self.state {
            InputState::Composing(c) if c.abbrev => "abbrev",
            _ => self.mode.name(),
        }
    }

    /// Pre-edit text for the current state.
    pub fn display(&self) -> String {
        let input = &self.settings.input;
        self.state
            .display(self.mode, &input.marker_henkan, &input.marker_henkan_select)
    }

    /// Literal edit string for everything since the previous call.
    pub fn output(&mut self) -> String {
        let next = self.display();
        self.pre_edit.output(&next)
    }

    pub fn pre_edit(&self) -> &PreEdit {
        &self.pre_edit
    }

    /// Headword being composed (used as the completion prefix).
    pub fn prefix(&self) -> &str {
        match &self.state {
            InputState::Composing(c) if c.okuri_feed.is_none() && !c.abbrev => &c.henkan_feed,
            _ => "",
        }
    }

    /// Pending romaji.
    pub fn feed(&self) -> &str {
        self.state.feed()
    }

    pub fn candidates(&self) -> &[String] {
        match &self.state {
            InputState::Converting(c) => &c.candidates,
            _ => &[],
        }
    }

    pub fn last_candidate(&self) -> Option<&LastCandidate> {
        self.last_candidate.as_ref()
    }

    pub fn store(&self) -> &Arc<DictionaryStore> {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fresh start in hiragana with the configured kana table.
    pub fn enable(&mut self) {
        self.reset();
        self.mode = InputMode::Hiragana;
        self.kana_table = self.settings.input.kana_table.clone();
        self.enabled = true;
    }

    /// Record a conversion committed outside the state machine (completion).
    pub fn set_last_candidate(&mut self, last: LastCandidate) {
        self.last_candidate = Some(last);
    }

    pub fn host_mode(&self) -> &str {
        &self.host_mode
    }

    pub fn set_host_mode(&mut self, mode: &str) {
        self.host_mode = mode.to_string();
    }

    pub fn kana_table(&self) -> &str {
        &self.kana_table
    }

    /// Switch the table used for kana modes. The name must be registered.
    pub fn set_kana_table(&mut self, name: &str) -> Result<(), SessionError> {
        if !self.tables.read().unwrap().contains(name) {
            return Err(KanaError::UnknownTable(name.to_string()).into());
        }
        self.kana_table = name.to_string();
        Ok(())
    }

    /// Drop all input state and pre-edit tracking. The input mode is kept.
    pub fn reset(&mut self) {
        self.state = InputState::default();
        self.pre_edit.reset();
    }

    /// Commit `text` to the output.
    fn emit(&mut self, text: &str) {
        self.pre_edit.kakutei(text);
    }
}
