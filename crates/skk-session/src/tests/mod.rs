mod henkan;
mod pager;

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use skk_core::dict::{DictionaryStore, SkkJisyo, UserDictionary};
use skk_core::kana::KanaTables;
use skk_core::settings::Settings;

use super::host::{Host, KeyRead};
use super::keymap::KeyMaps;
use super::InputSession;

pub(super) fn test_jisyo() -> SkkJisyo {
    let mut text = String::from(
        "\
;; okuri-ari entries.
おくr /送/贈/
つかt /使/遣/
;; okuri-nasi entries.
あ /亜/阿/
いい /良い/
かんじ /漢字/感じ/幹事/
ちょう> /超/
にほんご /日本語/
>てき /的/
",
    );
    text.push_str("たくさん /");
    for i in 1..=20 {
        write!(text, "候補{i:02}/").unwrap();
    }
    text.push('\n');
    SkkJisyo::parse(&text)
}

pub(super) fn make_store() -> Arc<DictionaryStore> {
    Arc::new(DictionaryStore::new(UserDictionary::new(), vec![test_jisyo()]))
}

pub(super) fn make_session() -> InputSession {
    make_session_with(|_| {})
}

pub(super) fn make_session_with(configure: impl FnOnce(&mut Settings)) -> InputSession {
    let mut settings = Settings::default();
    configure(&mut settings);
    InputSession::new(
        Arc::new(settings),
        Arc::new(RwLock::new(KanaTables::default())),
        Arc::new(RwLock::new(KeyMaps::default())),
        make_store(),
    )
}

/// Feed every character of `keys` as its own key and collect the output.
pub(super) fn type_string(session: &mut InputSession, host: &mut dyn Host, keys: &str) -> String {
    let mut out = String::new();
    for c in keys.chars() {
        session.handle_key(&c.to_string(), host).unwrap();
        out.push_str(&session.output());
    }
    out
}

/// Apply an edit string to an empty buffer.
pub(super) fn render(edits: &str) -> String {
    let mut buf = String::new();
    for c in edits.chars() {
        if c == '\x08' {
            buf.pop();
        } else {
            buf.push(c);
        }
    }
    buf
}

/// Type `keys` into a fresh session and return the resulting buffer text.
pub(super) fn typed(keys: &str) -> String {
    let mut session = make_session();
    render(&type_string(&mut session, &mut ScriptedHost::default(), keys))
}

/// Host double that answers prompts from a script and records what it
/// was asked to show.
#[derive(Debug, Default)]
pub(super) struct ScriptedHost {
    pub keys: VecDeque<KeyRead>,
    pub word: Option<String>,
    pub confirm: bool,
    pub shown: Vec<Vec<String>>,
    pub closed: usize,
    pub prompts: Vec<String>,
}

impl Host for ScriptedHost {
    fn read_key(&mut self, prompt: &str) -> KeyRead {
        self.prompts.push(prompt.to_string());
        self.keys.pop_front().unwrap_or(KeyRead::Interrupt)
    }

    fn show_candidates(&mut self, list: &[String]) {
        self.shown.push(list.to_vec());
    }

    fn close_candidates(&mut self) {
        self.closed += 1;
    }

    fn input_word(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.word.take()
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.confirm
    }
}
