use std::sync::Arc;

use tracing::debug;

use skk_core::kana::{Function, KanaOutput, KanaTable, MatchResult, ZEN_TABLE};

use super::host::Host;
use super::notation::key_char;
use super::types::{Affix, Composing, InputMode, InputState};
use super::{InputSession, SessionError};

/// One step of romaji resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fed {
    Kana(String),
    /// A key with no table entry, passed through as typed.
    Raw(char),
    Action(Function),
}

/// Resolve as much of `pending` as the table allows. Returns the resolved
/// steps and the romaji still waiting for more input.
pub(crate) fn transliterate(
    table: &KanaTable,
    pending: &str,
    accept_illegal: bool,
) -> (Vec<Fed>, String) {
    let mut out = Vec::new();
    let mut rest = pending.to_string();
    // Tails that feed each other (or grow) would otherwise never settle.
    let mut budget = pending.len() * 4 + 8;
    while !rest.is_empty() {
        if budget == 0 {
            debug!(pending, rest = %rest, "kana tails do not settle, dropping");
            rest.clear();
            break;
        }
        budget -= 1;
        match table.match_keys(&rest) {
            MatchResult::PartialMatch => break,
            MatchResult::Match { output, consumed } => {
                let remaining = &rest[consumed..];
                match output {
                    KanaOutput::Kana { kana, tail } => {
                        out.push(Fed::Kana(kana.clone()));
                        let next = format!("{tail}{remaining}");
                        if next == rest {
                            // A tail that re-feeds the whole key would never progress.
                            rest.clear();
                            break;
                        }
                        rest = next;
                    }
                    KanaOutput::Action(func) => {
                        out.push(Fed::Action(func.clone()));
                        rest = remaining.to_string();
                    }
                }
            }
            MatchResult::NoMatch => {
                let mut chars = rest.chars();
                let (Some(first), None) = (chars.next(), chars.next()) else {
                    // Stale romaji before the new key; keep only the key.
                    let last = rest.chars().last().map(String::from).unwrap_or_default();
                    rest = last;
                    continue;
                };
                if accept_illegal || !first.is_ascii_alphabetic() {
                    out.push(Fed::Raw(first));
                }
                rest.clear();
            }
        }
    }
    (out, rest)
}

/// Resolve `pending` completely, using shorter keys where a longer one
/// could still match. Unresolvable characters are dropped.
pub(crate) fn flush(table: &KanaTable, pending: &str) -> String {
    let mut out = String::new();
    let mut rest = pending;
    while let Some(first) = rest.chars().next() {
        match table.match_forced(rest) {
            MatchResult::Match {
                output: KanaOutput::Kana { kana, .. },
                consumed,
            } => {
                out.push_str(kana);
                rest = &rest[consumed..];
            }
            MatchResult::Match { consumed, .. } => rest = &rest[consumed..],
            _ => rest = &rest[first.len_utf8()..],
        }
    }
    out
}

impl InputSession {
    fn table_name(&self) -> &str {
        if self.mode == InputMode::WideLatin {
            ZEN_TABLE
        } else {
            &self.kana_table
        }
    }

    pub(super) fn kana_input(&mut self, key: &str, host: &mut dyn Host) -> Result<(), SessionError> {
        let Some(c) = key_char(key) else {
            return Ok(());
        };
        if let InputState::Converting(_) = self.state {
            return self.henkan_input(key, host);
        }
        if self.mode == InputMode::Latin {
            self.emit(&c.to_string());
            return Ok(());
        }

        if let InputState::Composing(comp) = &mut self.state {
            if comp.abbrev {
                if c == ' ' {
                    return self.henkan_first(key, host);
                }
                comp.henkan_feed.push(c);
                return Ok(());
            }
            if c == '>' && comp.feed.is_empty() && comp.okuri_feed.is_none() {
                if comp.henkan_feed.is_empty() {
                    comp.affix = Some(Affix::Suffix);
                    return Ok(());
                }
                comp.affix = Some(Affix::Prefix);
                return self.henkan_first(key, host);
            }
        }

        if c.is_ascii_uppercase() && self.mode.is_kana() {
            let has_entry = {
                let tables = self.tables.read().unwrap();
                tables.get(self.table_name())?.get(&c.to_string()).is_some()
            };
            if !has_entry {
                self.start_upper(host)?;
                return self.feed_key(c.to_ascii_lowercase(), host);
            }
        }
        self.feed_key(c, host)
    }

    /// Shift-key behaviour: begin composing, or begin okuri marking when a
    /// headword is already present.
    fn start_upper(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        if let InputState::Direct(_) = self.state {
            return self.henkan_point(host);
        }
        if let InputState::Composing(comp) = &mut self.state {
            if !comp.henkan_feed.is_empty() && comp.okuri_feed.is_none() {
                debug!(headword = %comp.henkan_feed, "okuri start");
                comp.okuri_feed = Some(String::new());
            }
        }
        Ok(())
    }

    fn feed_key(&mut self, c: char, host: &mut dyn Host) -> Result<(), SessionError> {
        let mut pending = self.state.feed().to_string();
        pending.push(c);
        let (steps, rest) = {
            let tables = Arc::clone(&self.tables);
            let tables = tables.read().unwrap();
            let table = tables.get(self.table_name())?;
            transliterate(table, &pending, self.settings.input.accept_illegal_result)
        };
        self.state.set_feed(rest);

        for step in steps {
            match step {
                Fed::Kana(kana) => self.emit_kana(&kana),
                Fed::Raw(ch) => self.emit_kana(&ch.to_string()),
                Fed::Action(func) => {
                    let key = c.to_string();
                    self.call(&func, &key, host)?;
                }
            }
        }

        if self.okuri_complete() && self.settings.input.immediately_okuri_convert {
            return self.henkan_first("", host);
        }
        Ok(())
    }

    fn okuri_complete(&self) -> bool {
        matches!(
            &self.state,
            InputState::Composing(c)
                if c.feed.is_empty() && c.okuri_feed.as_deref().is_some_and(|o| !o.is_empty())
        )
    }

    fn emit_kana(&mut self, kana: &str) {
        match &mut self.state {
            InputState::Direct(_) => self.pre_edit.kakutei(&self.mode.convert(kana)),
            InputState::Composing(comp) => match &mut comp.okuri_feed {
                Some(okuri) => okuri.push_str(kana),
                None => comp.henkan_feed.push_str(kana),
            },
            InputState::Converting(_) => {}
        }
    }

    /// Resolve pending romaji as far as it goes (`n` → `ん`).
    pub(super) fn kakutei_feed(&mut self) -> Result<(), SessionError> {
        let pending = self.state.feed().to_string();
        if pending.is_empty() {
            return Ok(());
        }
        let kana = {
            let tables = Arc::clone(&self.tables);
            let tables = tables.read().unwrap();
            flush(tables.get(self.table_name())?, &pending)
        };
        self.state.set_feed(String::new());
        if !kana.is_empty() {
            self.emit_kana(&kana);
        }
        Ok(())
    }

    pub(super) fn delete_char(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        if let InputState::Converting(_) = self.state {
            let mut text = self.commit_conversion(host);
            text.pop();
            self.emit(&text);
            return Ok(());
        }
        match &mut self.state {
            InputState::Direct(d) => {
                if d.feed.pop().is_none() {
                    self.pre_edit.kakutei("\x08");
                }
            }
            InputState::Composing(comp) => {
                if comp.feed.pop().is_some() {
                    return Ok(());
                }
                if let Some(okuri) = &mut comp.okuri_feed {
                    if okuri.pop().is_none() {
                        comp.okuri_feed = None;
                    }
                    return Ok(());
                }
                if comp.henkan_feed.pop().is_none() {
                    self.state = InputState::default();
                }
            }
            InputState::Converting(_) => {}
        }
        Ok(())
    }

    /// Start composing, or start okuri marking when already composing.
    pub(super) fn henkan_point(&mut self, host: &mut dyn Host) -> Result<(), SessionError> {
        match &self.state {
            InputState::Direct(_) => {
                self.kakutei_feed()?;
                self.state = InputState::Composing(Composing::default());
            }
            InputState::Composing(comp) => {
                if comp.abbrev || comp.okuri_feed.is_some() || comp.henkan_feed.is_empty() {
                    return Ok(());
                }
                self.kakutei_feed()?;
                if let InputState::Composing(comp) = &mut self.state {
                    comp.okuri_feed = Some(String::new());
                }
            }
            InputState::Converting(_) => {
                let text = self.commit_conversion(host);
                self.emit(&text);
                self.state = InputState::Composing(Composing::default());
            }
        }
        Ok(())
    }
}
