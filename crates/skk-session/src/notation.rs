//! Minimal key notation: the handful of `<...>` names the default keymaps use.

use std::borrow::Cow;

const NOTATIONS: &[(&str, char)] = &[
    ("<space>", ' '),
    ("<cr>", '\r'),
    ("<nl>", '\n'),
    ("<esc>", '\x1b'),
    ("<bs>", '\x08'),
    ("<c-h>", '\x08'),
    ("<c-g>", '\x07'),
    ("<c-q>", '\x11'),
    ("<c-j>", '\n'),
    ("<tab>", '\t'),
    ("<lt>", '<'),
    ("<bar>", '|'),
    ("<bslash>", '\\'),
];

/// Canonical keymap key: raw control characters and space become their
/// notation, `<...>` names are lower-cased, anything else is unchanged.
pub fn normalize(key: &str) -> Cow<'_, str> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c != '<' && !c.is_control() && c != ' ' {
            return Cow::Borrowed(key);
        }
        if let Some((name, _)) = NOTATIONS.iter().find(|(_, ch)| *ch == c) {
            return Cow::Borrowed(name);
        }
        return Cow::Borrowed(key);
    }
    if key.len() > 2 && key.starts_with('<') && key.ends_with('>') {
        let lower = key.to_ascii_lowercase();
        return match lower.as_str() {
            "<c-j>" => Cow::Borrowed("<nl>"),
            _ => Cow::Owned(lower),
        };
    }
    Cow::Borrowed(key)
}

/// The character a key produces, if any.
pub fn key_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(c);
    }
    let lower = key.to_ascii_lowercase();
    NOTATIONS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
}
