use tracing::debug;

use skk_core::dict::strip_annotation;

use super::host::Host;
use super::types::{Affix, Composing, InputMode, InputState, LastCandidate};
use super::{InputSession, SessionError};

impl InputSession {
    /// Finish a conversion: learn the chosen candidate and return the text
    /// to insert. A prefix word leaves the session composing the next word.
    pub(super) fn commit_conversion(&mut self, host: &mut dyn Host) -> String {
        let InputState::Converting(conv) = std::mem::take(&mut self.state) else {
            return String::new();
        };
        host.close_candidates();
        let Some(candidate) = conv.current() else {
            return self.mode.convert(&format!("{}{}", conv.henkan_feed, conv.okuri_tail));
        };
        self.store.register(conv.kind, &conv.word, candidate);
        debug!(word = %conv.word, candidate, "kakutei");
        let text = format!(
            "{}{}",
            strip_annotation(candidate),
            self.mode.convert(&conv.okuri_tail)
        );
        self.last_candidate = Some(LastCandidate {
            kind: conv.kind,
            word: conv.word.clone(),
            candidate: candidate.to_string(),
        });
        if conv.affix == Some(Affix::Prefix) {
            self.state = InputState::Composing(Composing::default());
        }
        text
    }

    /// Commit whatever the current state shows and return to direct input.
    pub(super) fn kakutei(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        self.kakutei_feed()?;
        match std::mem::take(&mut self.state) {
            InputState::Direct(_) => {
                if matches!(self.mode, InputMode::Latin | InputMode::WideLatin) {
                    self.mode = InputMode::Hiragana;
                }
            }
            InputState::Composing(comp) => {
                let text = if comp.abbrev {
                    comp.henkan_feed
                } else {
                    self.mode.convert(&comp.reading())
                };
                self.emit(&text);
            }
            conv @ InputState::Converting(_) => {
                self.state = conv;
                let text = self.commit_conversion(host);
                self.emit(&text);
            }
        }
        Ok(())
    }

    /// Commit, then insert a newline unless `egg_like_newline` swallows it.
    pub(super) fn newline(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        let was_active = !matches!(self.state, InputState::Direct(_));
        self.kakutei(host)?;
        if !(self.settings.input.egg_like_newline && was_active) {
            self.emit("\n");
        }
        Ok(())
    }

    pub(super) fn cancel(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        host.close_candidates();
        let converting = matches!(self.state, InputState::Converting(_));
        if converting && !self.settings.input.immediately_cancel {
            self.back_to_composing();
        } else {
            self.state = InputState::default();
        }
        Ok(())
    }

    /// Commit pending input and leave the engine disabled in hiragana mode.
    pub(super) fn disable(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        self.kakutei(host)?;
        self.state = InputState::default();
        self.mode = InputMode::Hiragana;
        self.enabled = false;
        Ok(())
    }
}
