use std::collections::HashMap;

use skk_core::kana::Function;

use super::notation::normalize;
use super::types::StateKind;
use super::SessionError;

#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Used for keys without an explicit mapping.
    pub default: Function,
    pub map: HashMap<String, Function>,
}

impl KeyMap {
    fn new(default: Function, entries: &[(&str, Function)]) -> Self {
        Self {
            default,
            map: entries
                .iter()
                .map(|(k, f)| (k.to_string(), f.clone()))
                .collect(),
        }
    }

    pub fn resolve(&self, key: &str) -> &Function {
        self.map.get(normalize(key).as_ref()).unwrap_or(&self.default)
    }
}

/// Per-state keymaps shared by every session of an engine.
#[derive(Debug, Clone)]
pub struct KeyMaps {
    input: KeyMap,
    henkan: KeyMap,
}

impl Default for KeyMaps {
    fn default() -> Self {
        use Function::*;
        Self {
            input: KeyMap::new(
                KanaInput,
                &[
                    ("<bs>", DeleteChar),
                    ("<c-g>", Cancel),
                    ("<c-h>", DeleteChar),
                    ("<cr>", Newline),
                    ("<esc>", Escape),
                    ("<nl>", Kakutei),
                    ("<c-q>", Hankatakana),
                    ("<c-space>", HenkanFirst),
                    ("<s-space>", HenkanFirst),
                ],
            ),
            henkan: KeyMap::new(
                HenkanInput,
                &[
                    ("<c-g>", Cancel),
                    ("<cr>", Newline),
                    ("<nl>", Kakutei),
                    ("<space>", HenkanForward),
                    ("<s-space>", HenkanForward),
                    ("<c-space>", HenkanForward),
                    ("x", HenkanBackward),
                    ("X", PurgeCandidate),
                ],
            ),
        }
    }
}

impl KeyMaps {
    pub fn get(&self, kind: StateKind) -> &KeyMap {
        match kind {
            StateKind::Input => &self.input,
            StateKind::Henkan => &self.henkan,
        }
    }

    pub fn resolve(&self, kind: StateKind, key: &str) -> Function {
        self.get(kind).resolve(key).clone()
    }

    /// Bind `key` to the function named `function` in the keymap `state`
    /// (`input` or `henkan`). An empty function name removes the binding.
    pub fn register(&mut self, state: &str, key: &str, function: &str) -> Result<(), SessionError> {
        let keymap = match state {
            "input" => &mut self.input,
            "henkan" => &mut self.henkan,
            _ => return Err(SessionError::UnknownState(state.to_string())),
        };
        let key = normalize(key).into_owned();
        if function.is_empty() {
            keymap.map.remove(&key);
            return Ok(());
        }
        let func: Function = function
            .parse()
            .map_err(|_| SessionError::UnknownFunction(function.to_string()))?;
        tracing::debug!(state, key, %func, "register keymap");
        keymap.map.insert(key, func);
        Ok(())
    }
}
