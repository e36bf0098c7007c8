//! SKK input method engine for editor plugins.
//!
//! The conversion machinery lives in `skk-core` (kana tables, dictionaries,
//! skkserv client) and `skk-session` (the per-context state machine). This
//! crate wires them into one [`Engine`] that a host drives key by key.

pub mod api;
mod trace_init;

pub use api::{
    CompleteInfo, CompleteType, Engine, EngineError, HostStatus, MODE_CHANGE_NUDGE,
};
pub use skk_core::settings::{load_settings, parse_settings_toml, Settings};
pub use skk_session::{Host, KeyRead, NullHost};
