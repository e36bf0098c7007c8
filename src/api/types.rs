use std::fmt;
use std::str::FromStr;

use skk_core::dict::DictError;
use skk_core::kana::KanaError;
use skk_core::settings::SettingsError;
use skk_session::SessionError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Kana(#[from] KanaError),
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

// ---------------------------------------------------------------------------
// Host status (sent with every key)
// ---------------------------------------------------------------------------

/// Completion popup state at the time of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompleteInfo {
    pub pum_visible: bool,
    /// Selected item, `-1` when none.
    pub selected: isize,
}

impl Default for CompleteInfo {
    fn default() -> Self {
        Self {
            pum_visible: false,
            selected: -1,
        }
    }
}

/// Completion frontend in use; decides how a selection is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompleteType {
    #[default]
    Native,
    PumVim,
    Cmp,
}

impl CompleteType {
    /// Key sequence that confirms the selected completion item.
    pub fn confirm_sequence(self) -> &'static str {
        match self {
            CompleteType::Native => "\x19",
            CompleteType::PumVim => "<Cmd>call pum#map#confirm()",
            CompleteType::Cmp => "<Cmd>lua require('cmp').confirm({select = true})",
        }
    }
}

impl FromStr for CompleteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(CompleteType::Native),
            "pum.vim" => Ok(CompleteType::PumVim),
            "cmp" => Ok(CompleteType::Cmp),
            _ => Err(format!("unknown complete type: {s}")),
        }
    }
}

impl fmt::Display for CompleteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompleteType::Native => "native",
            CompleteType::PumVim => "pum.vim",
            CompleteType::Cmp => "cmp",
        })
    }
}

/// What the host knows about the buffer when it forwards a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStatus {
    /// Text before the cursor on the current line.
    pub prev_input: String,
    pub complete_info: CompleteInfo,
    pub complete_type: CompleteType,
    /// Editor mode (`i`, `c`, `R`, ...).
    pub mode: String,
}

impl Default for HostStatus {
    fn default() -> Self {
        Self {
            prev_input: String::new(),
            complete_info: CompleteInfo::default(),
            complete_type: CompleteType::default(),
            mode: "i".to_string(),
        }
    }
}

impl HostStatus {
    pub fn with_prev_input(prev_input: impl Into<String>) -> Self {
        Self {
            prev_input: prev_input.into(),
            ..Self::default()
        }
    }
}
