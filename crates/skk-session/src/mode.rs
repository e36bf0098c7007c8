use tracing::debug;

use super::host::Host;
use super::types::{Composing, InputMode, InputState};
use super::{InputSession, SessionError};

impl InputSession {
    fn set_mode(&mut self, mode: InputMode) {
        debug!(from = self.mode.name(), to = mode.name(), "mode change");
        self.mode = mode;
    }

    pub(super) fn abbrev(&mut self) -> Result<(), SessionError> {
        if let InputState::Direct(_) = self.state {
            self.kakutei_feed()?;
            self.state = InputState::Composing(Composing::abbrev());
        }
        Ok(())
    }

    /// Commit the composed reading rendered in `mode`, leaving the session
    /// mode untouched.
    fn commit_reading_as(&mut self, mode: InputMode) -> Result<(), SessionError> {
        self.kakutei_feed()?;
        if let InputState::Composing(comp) = std::mem::take(&mut self.state) {
            let text = if comp.abbrev {
                comp.henkan_feed
            } else {
                mode.convert(&comp.reading())
            };
            self.emit(&text);
        }
        Ok(())
    }

    /// Switch to `target`, or back to hiragana when already there. While
    /// composing, the reading is committed in `target` instead.
    fn toggle_kana_mode(&mut self, target: InputMode, host: &mut dyn Host) -> Result<(), SessionError> {
        match self.state {
            InputState::Composing(_) => {
                let script = if self.mode == target {
                    InputMode::Hiragana
                } else {
                    target
                };
                self.commit_reading_as(script)
            }
            InputState::Converting(_) => {
                self.kakutei(host)?;
                self.toggle_kana_mode(target, host)
            }
            InputState::Direct(_) => {
                self.kakutei_feed()?;
                let next = if self.mode == target {
                    InputMode::Hiragana
                } else {
                    target
                };
                self.set_mode(next);
                Ok(())
            }
        }
    }

    pub(super) fn hirakana(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        match self.state {
            InputState::Composing(_) => self.commit_reading_as(InputMode::Hiragana),
            _ => {
                self.kakutei(host)?;
                self.set_mode(InputMode::Hiragana);
                Ok(())
            }
        }
    }

    pub(super) fn katakana(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        self.toggle_kana_mode(InputMode::Katakana, host)
    }

    pub(super) fn hankatakana(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        self.toggle_kana_mode(InputMode::HankakuKatakana, host)
    }

    /// `latin` and `zenkaku`: commit, then pass keys through (optionally widened).
    pub(super) fn set_latin_mode(&mut self, mode: InputMode, host: &mut dyn Host) -> Result<(), SessionError> {
        self.kakutei(host)?;
        self.set_mode(mode);
        Ok(())
    }

    /// `upper-<key>`: behave as if `<key>` had been typed with shift.
    pub(super) fn upper(&mut self, key: &str, host: &mut dyn Host) -> Result<(), SessionError> {
        self.henkan_point(host)?;
        self.handle_key(key, host)
    }
}
