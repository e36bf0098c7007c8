use std::collections::VecDeque;
use std::process;

use serde::Serialize;

use skk_engine::{Engine, EngineError, HostStatus, Settings};
use skk_session::{key_char, normalize, Host, KeyRead};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Split a key string into keys: `<...>` notations stay whole, anything
/// else is one key per character.
pub fn split_keys(keys: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = keys;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(end) = rest.find('>').filter(|&e| e > 1) {
                out.push(rest[..=end].to_string());
                rest = &rest[end + 1..];
                continue;
            }
        }
        out.push(c.to_string());
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Apply a literal edit (text with `\x08` backspaces) to `buffer`.
pub fn apply_edit(buffer: &mut String, edit: &str) {
    for c in edit.chars() {
        if c == '\x08' {
            buffer.pop();
        } else {
            buffer.push(c);
        }
    }
}

/// Host for offline runs. Paging reads consume the remaining keys, and
/// registration prompts are answered from the command line.
pub struct BatchHost {
    pub keys: VecDeque<String>,
    pub word: Option<String>,
    pub confirm: bool,
    pub verbose: bool,
}

impl BatchHost {
    pub fn new(keys: &str) -> Self {
        Self {
            keys: split_keys(keys).into(),
            word: None,
            confirm: false,
            verbose: false,
        }
    }
}

impl Host for BatchHost {
    fn read_key(&mut self, prompt: &str) -> KeyRead {
        if self.verbose {
            eprintln!("{prompt}");
        }
        match self.keys.pop_front() {
            Some(key) => match &*normalize(&key) {
                "<c-g>" | "<esc>" => KeyRead::Interrupt,
                _ => key_char(&key).map_or(KeyRead::Interrupt, KeyRead::Key),
            },
            None => KeyRead::Interrupt,
        }
    }

    fn show_candidates(&mut self, list: &[String]) {
        if self.verbose {
            eprintln!("candidates: {}", list.join(" "));
        }
    }

    fn input_word(&mut self, prompt: &str) -> Option<String> {
        if self.verbose {
            eprintln!("{prompt}{}", self.word.as_deref().unwrap_or(""));
        }
        self.word.clone()
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.verbose {
            eprintln!("{prompt} {}", if self.confirm { "yes" } else { "no" });
        }
        self.confirm
    }

    fn message(&mut self, text: &str) {
        eprintln!("{text}");
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConvertResult {
    /// Buffer contents after every edit was applied.
    pub buffer: String,
    /// Uncommitted part at the end of `buffer`.
    pub pre_edit: String,
    pub mode: String,
}

/// Feed every key in `host.keys` through `engine`, tracking the buffer the
/// way an editor would.
pub fn run_keys(engine: &mut Engine, host: &mut BatchHost) -> Result<ConvertResult, EngineError> {
    let mut buffer = String::new();
    engine.enable(None, &HostStatus::default(), host)?;
    while let Some(key) = host.keys.pop_front() {
        let status = HostStatus::with_prev_input(buffer.clone());
        let edit = engine.handle(&key, &status, host)?;
        apply_edit(&mut buffer, &edit);
    }
    Ok(ConvertResult {
        buffer,
        pre_edit: engine.pre_edit(),
        mode: engine.mode_name().to_string(),
    })
}

pub struct ConvertOptions<'a> {
    pub word: Option<&'a str>,
    pub confirm: bool,
    pub save: bool,
    pub json: bool,
    pub verbose: bool,
}

pub fn convert_cmd(settings: Settings, keys: &str, opts: &ConvertOptions<'_>) {
    let mut engine = die!(Engine::new(settings), "Error: {}");
    let mut host = BatchHost::new(keys);
    host.word = opts.word.map(str::to_string);
    host.confirm = opts.confirm;
    host.verbose = opts.verbose;
    let result = die!(run_keys(&mut engine, &mut host), "Error: {}");
    if opts.save {
        die!(engine.save(), "Error saving dictionary: {}");
    }
    if opts.json {
        println!("{}", die!(serde_json::to_string_pretty(&result), "Error: {}"));
    } else {
        println!("{}", result.buffer);
        if !result.pre_edit.is_empty() {
            eprintln!("(pending: {}, mode: {})", result.pre_edit, result.mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use skk_core::dict::{DictionaryStore, SkkJisyo, UserDictionary};

    use super::*;

    fn engine() -> Engine {
        let jisyo = SkkJisyo::parse(";; okuri-nasi entries.\nにほんご /日本語/\n");
        let store = DictionaryStore::new(UserDictionary::new(), vec![jisyo]);
        Engine::with_store(Settings::default(), Arc::new(store)).unwrap()
    }

    #[test]
    fn split_notations() {
        assert_eq!(split_keys("a<space>b"), vec!["a", "<space>", "b"]);
        assert_eq!(split_keys("<>"), vec!["<", ">"]);
        assert_eq!(split_keys("<c-j>"), vec!["<c-j>"]);
        assert_eq!(split_keys("x<"), vec!["x", "<"]);
    }

    #[test]
    fn apply_backspaces() {
        let mut buf = String::from("▽にほんご");
        apply_edit(&mut buf, "\x08\x08\x08\x08\x08日本語");
        assert_eq!(buf, "日本語");
    }

    #[test]
    fn converts_offline() {
        let mut engine = engine();
        let mut host = BatchHost::new("Nihongo<space><c-j>desu");
        let result = run_keys(&mut engine, &mut host).unwrap();
        assert_eq!(result.buffer, "日本語です");
        assert_eq!(result.pre_edit, "");
        assert_eq!(result.mode, "hira");
    }

    #[test]
    fn pending_input_is_reported() {
        let mut engine = engine();
        let mut host = BatchHost::new("Nihongo ");
        let result = run_keys(&mut engine, &mut host).unwrap();
        assert_eq!(result.buffer, "▼日本語");
        assert_eq!(result.pre_edit, "▼日本語");
    }
}
