use skk_core::dict::{strip_annotation, HenkanType};
use skk_core::unicode::{hiragana_to_hankaku, hiragana_to_katakana};

/// Script that kana input is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Hiragana,
    Katakana,
    HankakuKatakana,
    /// Keys pass through unconverted.
    Latin,
    /// Keys are converted through the `zen` table.
    WideLatin,
}

impl InputMode {
    pub fn is_kana(self) -> bool {
        matches!(
            self,
            InputMode::Hiragana | InputMode::Katakana | InputMode::HankakuKatakana
        )
    }

    /// Render hiragana in this mode's script.
    pub fn convert(self, hiragana: &str) -> String {
        match self {
            InputMode::Katakana => hiragana_to_katakana(hiragana),
            InputMode::HankakuKatakana => hiragana_to_hankaku(hiragana),
            _ => hiragana.to_string(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            InputMode::Hiragana => "hira",
            InputMode::Katakana => "kata",
            InputMode::HankakuKatakana => "hankata",
            InputMode::Latin => "latin",
            InputMode::WideLatin => "zenkaku",
        }
    }
}

/// Which side of a `>` an affix word was typed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    /// `せつ>` looks up `せつ>`, a word that attaches before the next one.
    Prefix,
    /// `>てき` looks up `>てき`, a word that attaches after the previous one.
    Suffix,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Direct {
    /// Romaji not yet resolved to kana.
    pub feed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composing {
    pub henkan_feed: String,
    /// Present once okuri marking has started.
    pub okuri_feed: Option<String>,
    pub feed: String,
    pub abbrev: bool,
    pub affix: Option<Affix>,
}

impl Composing {
    pub fn abbrev() -> Self {
        Self {
            abbrev: true,
            ..Self::default()
        }
    }

    /// Dictionary word and partition for the current reading.
    pub fn lookup_word(&self) -> (HenkanType, String) {
        match self.okuri_feed.as_deref() {
            Some(okuri) if !okuri.is_empty() => (
                HenkanType::OkuriAri,
                skk_core::okuri::okuri_word(&self.henkan_feed, okuri),
            ),
            _ => {
                let word = match self.affix {
                    Some(Affix::Prefix) => format!("{}>", self.henkan_feed),
                    Some(Affix::Suffix) => format!(">{}", self.henkan_feed),
                    None => self.henkan_feed.clone(),
                };
                (HenkanType::OkuriNasi, word)
            }
        }
    }

    /// Reading as typed, including any okurigana.
    pub fn reading(&self) -> String {
        let mut s = self.henkan_feed.clone();
        if let Some(okuri) = &self.okuri_feed {
            s.push_str(okuri);
        }
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converting {
    pub kind: HenkanType,
    /// Dictionary headword, e.g. `おくr`.
    pub word: String,
    pub henkan_feed: String,
    pub okuri_tail: String,
    pub candidates: Vec<String>,
    /// `-1` until the first forward step.
    pub index: isize,
    pub affix: Option<Affix>,
}

impl Converting {
    pub fn current(&self) -> Option<&str> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.candidates.get(i))
            .map(String::as_str)
    }

    /// Back to the reading the conversion started from.
    pub fn into_composing(self) -> Composing {
        Composing {
            henkan_feed: self.henkan_feed,
            okuri_feed: (!self.okuri_tail.is_empty()).then_some(self.okuri_tail),
            feed: String::new(),
            abbrev: false,
            affix: self.affix,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputState {
    Direct(Direct),
    Composing(Composing),
    Converting(Converting),
}

impl Default for InputState {
    fn default() -> Self {
        InputState::Direct(Direct::default())
    }
}

impl InputState {
    pub fn kind(&self) -> StateKind {
        match self {
            InputState::Direct(_) | InputState::Composing(_) => StateKind::Input,
            InputState::Converting(_) => StateKind::Henkan,
        }
    }

    /// Pending romaji.
    pub fn feed(&self) -> &str {
        match self {
            InputState::Direct(d) => &d.feed,
            InputState::Composing(c) => &c.feed,
            InputState::Converting(_) => "",
        }
    }

    pub(crate) fn set_feed(&mut self, feed: String) {
        match self {
            InputState::Direct(d) => d.feed = feed,
            InputState::Composing(c) => c.feed = feed,
            InputState::Converting(_) => {}
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InputState::Direct(d) if d.feed.is_empty())
    }

    /// Pre-edit text shown for this state.
    pub fn display(&self, mode: InputMode, marker_henkan: &str, marker_select: &str) -> String {
        match self {
            InputState::Direct(d) => d.feed.clone(),
            InputState::Composing(c) => {
                let mut s = marker_henkan.to_string();
                if c.affix == Some(Affix::Suffix) {
                    s.push('>');
                }
                if c.abbrev {
                    s.push_str(&c.henkan_feed);
                } else {
                    s.push_str(&mode.convert(&c.henkan_feed));
                }
                if let Some(okuri) = &c.okuri_feed {
                    s.push('*');
                    s.push_str(&mode.convert(okuri));
                }
                s.push_str(&c.feed);
                s
            }
            InputState::Converting(c) => {
                let shown = c
                    .current()
                    .map(|cand| strip_annotation(cand).to_string())
                    .unwrap_or_else(|| c.henkan_feed.clone());
                format!("{marker_select}{shown}{}", mode.convert(&c.okuri_tail))
            }
        }
    }
}

/// Keymap selector: `input` covers Direct and Composing, `henkan` covers Converting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Input,
    Henkan,
}

/// The most recent committed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCandidate {
    pub kind: HenkanType,
    pub word: String,
    pub candidate: String,
}
