use tracing::{debug, debug_span};

use super::host::{Host, KeyRead};
use super::notation::key_char;
use super::types::{Affix, Composing, Converting, InputState};
use super::{InputSession, SessionError};

/// Outcome of asking the host for a new dictionary word.
enum Registration {
    Committed,
    Declined,
}

impl InputSession {
    /// Look up the composed reading and show the first candidate.
    pub(super) fn henkan_first(&mut self, key: &str, host: &mut dyn Host) -> Result<(), SessionError> {
        self.kakutei_feed()?;
        match self.state {
            InputState::Direct(_) => {
                if let Some(c) = key_char(key) {
                    self.emit(&c.to_string());
                }
                return Ok(());
            }
            InputState::Converting(_) => return self.henkan_forward(host),
            InputState::Composing(_) => {}
        }
        let InputState::Composing(comp) = &self.state else {
            return Ok(());
        };
        if comp.henkan_feed.is_empty() {
            return Ok(());
        }

        let (kind, word) = comp.lookup_word();
        let henkan_feed = comp.henkan_feed.clone();
        let okuri_tail = comp.okuri_feed.clone().unwrap_or_default();
        let affix = comp.affix;

        let _span = debug_span!("henkan_first", %kind, word).entered();
        let candidates = self.store.lookup(kind, &word);
        debug!(count = candidates.len(), "henkan start");
        self.state = InputState::Converting(Converting {
            kind,
            word,
            henkan_feed,
            okuri_tail,
            candidates,
            index: -1,
            affix,
        });
        self.henkan_forward(host)
    }

    pub(super) fn henkan_forward(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        let InputState::Converting(conv) = &mut self.state else {
            return Ok(());
        };
        let old = conv.index;
        let Some(next) = self.pager.next(old, conv.candidates.len()) else {
            debug!(word = %conv.word, old, "candidates exhausted");
            host.close_candidates();
            if let Registration::Declined = self.register_word(host) {
                self.rewind(old);
            }
            return Ok(());
        };
        conv.index = next;
        self.refresh_page(host)
    }

    pub(super) fn henkan_backward(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        let InputState::Converting(conv) = &mut self.state else {
            return Ok(());
        };
        conv.index = self.pager.backward(conv.index);
        if conv.index < 0 {
            host.close_candidates();
            self.back_to_composing();
            return Ok(());
        }
        self.refresh_page(host)
    }

    /// A key that is not a henkan command: choose from the page, or commit
    /// and handle the key as fresh input.
    pub(super) fn henkan_input(&mut self, key: &str, host: &mut dyn Host) -> Result<(), SessionError> {
        let InputState::Converting(conv) = &mut self.state else {
            return self.kana_input(key, host);
        };
        host.close_candidates();
        let c = key_char(key);
        if self.pager.is_paged(conv.index) {
            if let Some(c) = c.filter(|c| self.pager.keys().contains(c)) {
                if let Some(i) = self.pager.select(conv.index, c, conv.candidates.len()) {
                    conv.index = i as isize;
                    let text = self.commit_conversion(host);
                    self.emit(&text);
                }
                return Ok(());
            }
        }
        let text = self.commit_conversion(host);
        self.emit(&text);
        if c == Some('>') {
            self.state = InputState::Composing(Composing {
                affix: Some(Affix::Suffix),
                ..Composing::default()
            });
            return Ok(());
        }
        self.handle_key(key, host)
    }

    /// Remove the current candidate from the user dictionary after
    /// confirmation.
    pub(super) fn purge_candidate(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        let InputState::Converting(conv) = &self.state else {
            return Ok(());
        };
        let Some(candidate) = conv.current() else {
            return Ok(());
        };
        let prompt = format!("Really purge? {} /{}/", conv.word, candidate);
        if host.confirm(&prompt) {
            self.store.purge(conv.kind, &conv.word, candidate);
            host.close_candidates();
            self.state = InputState::default();
        }
        Ok(())
    }

    /// Show the page for a paged index, interactively when popups are not
    /// available.
    fn refresh_page(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        let InputState::Converting(conv) = &self.state else {
            return Ok(());
        };
        if !self.pager.is_paged(conv.index) {
            host.close_candidates();
            return Ok(());
        }
        if self.settings.candidates.use_popup && self.host_mode == "i" {
            let start = self.pager.page_start(conv.index);
            host.show_candidates(&self.pager.labels(&conv.candidates, start));
            return Ok(());
        }
        self.select_candidates(host)
    }

    /// Read keys page by page until a candidate is chosen or the read is
    /// interrupted.
    fn select_candidates(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        let InputState::Converting(conv) = &self.state else {
            return Ok(());
        };
        let mut page = self.pager.interactive_page(conv.index);
        let inline_end = self.pager.show_count() as isize - 1;
        loop {
            let InputState::Converting(conv) = &mut self.state else {
                return Ok(());
            };
            let len = conv.candidates.len();
            let start = self.pager.interactive_start(page);
            if start >= len {
                match self.register_word(host) {
                    Registration::Committed => return Ok(()),
                    Registration::Declined if page > 0 => {
                        page -= 1;
                        continue;
                    }
                    Registration::Declined => {
                        self.rewind(inline_end);
                        return Ok(());
                    }
                }
            }
            let labels = self.pager.labels(&conv.candidates, start);
            let rest = len.saturating_sub(start + labels.len());
            let prompt = format!("{} [残り {}]", labels.join("  "), rest);
            match host.read_key(&prompt) {
                KeyRead::Key(' ') => page += 1,
                KeyRead::Key('x') => {
                    if page == 0 {
                        conv.index = inline_end;
                        return Ok(());
                    }
                    page -= 1;
                }
                KeyRead::Key(c) => {
                    let Some(pos) = self.pager.keys().iter().position(|&k| k == c) else {
                        continue;
                    };
                    if start + pos < len {
                        conv.index = (start + pos) as isize;
                        let text = self.commit_conversion(host);
                        self.emit(&text);
                        return Ok(());
                    }
                }
                KeyRead::Interrupt => {
                    if self.settings.input.immediately_cancel {
                        self.state = InputState::default();
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Ask the host for a word to add under the current headword. An
    /// accepted word becomes the sole candidate and is committed.
    fn register_word(&mut self, host: &mut dyn Host) -> Registration {
        let InputState::Converting(conv) = &mut self.state else {
            return Registration::Declined;
        };
        let reading = if conv.okuri_tail.is_empty() {
            conv.henkan_feed.clone()
        } else {
            format!("{}*{}", conv.henkan_feed, conv.okuri_tail)
        };
        let prompt = format!("[辞書登録] {reading}: ");
        match host.input_word(&prompt) {
            Some(word) if !word.is_empty() => {
                debug!(headword = %conv.word, word, "registering new word");
                conv.candidates = vec![word];
                conv.index = 0;
                let text = self.commit_conversion(host);
                self.emit(&text);
                Registration::Committed
            }
            _ => Registration::Declined,
        }
    }

    /// Return to `index`, or to composing when no candidate was shown yet.
    fn rewind(&mut self, index: isize) {
        if index < 0 {
            self.back_to_composing();
        } else if let InputState::Converting(conv) = &mut self.state {
            conv.index = index;
        }
    }

    pub(super) fn back_to_composing(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            InputState::Converting(conv) => InputState::Composing(conv.into_composing()),
            other => other,
        };
    }
}
