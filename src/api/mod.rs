//! Host-facing surface of the engine.
//!
//! An editor plugin forwards keys together with a [`HostStatus`] snapshot
//! and inserts the returned string literally.

mod engine;
mod types;


pub use engine::{Engine, MODE_CHANGE_NUDGE};
pub use types::{CompleteInfo, CompleteType, EngineError, HostStatus};

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// The embedded default settings, for hosts that want to show or export them.
pub fn settings_default_config() -> &'static str {
    skk_core::settings::default_toml()
}

/// The embedded default romaji table.
pub fn kana_default_config() -> &'static str {
    skk_core::kana::DEFAULT_TOML
}

/// Install the JSON file logger. Always `false` unless built with `trace`.
pub fn trace_init(log_dir: &str) -> bool {
    crate::trace_init::init_tracing(std::path::Path::new(log_dir))
}
