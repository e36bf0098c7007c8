//! The editor side of a session: prompts, popups and messages.

/// Outcome of a blocking key read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRead {
    Key(char),
    /// The user aborted the read (e.g. `<c-c>`).
    Interrupt,
}

/// Host collaborator. Every method has a no-op default so hosts only
/// implement what they can show.
pub trait Host {
    fn read_key(&mut self, _prompt: &str) -> KeyRead {
        KeyRead::Interrupt
    }

    fn show_candidates(&mut self, _list: &[String]) {}

    fn close_candidates(&mut self) {}

    /// Ask for a word to register; `None` when the user declined.
    fn input_word(&mut self, _prompt: &str) -> Option<String> {
        None
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }

    fn message(&mut self, _text: &str) {}
}

/// A host with no UI: prompts are declined, popups are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl Host for NullHost {}
