use std::fmt;
use std::str::FromStr;

use super::KanaError;

/// A named engine behaviour that a kana table entry or a keymap can bind to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Kakutei,
    Newline,
    Cancel,
    Disable,
    Escape,
    HenkanFirst,
    HenkanForward,
    HenkanBackward,
    PurgeCandidate,
    HenkanInput,
    KanaInput,
    KakuteiFeed,
    HenkanPoint,
    DeleteChar,
    Abbrev,
    Hirakana,
    Katakana,
    Hankatakana,
    Zenkaku,
    Latin,
    /// `upper-<key>`: start composing, then handle `<key>`.
    Upper(String),
}

const NAMED: &[(&str, Function)] = &[
    ("kakutei", Function::Kakutei),
    ("newline", Function::Newline),
    ("cancel", Function::Cancel),
    ("disable", Function::Disable),
    ("escape", Function::Escape),
    ("henkanFirst", Function::HenkanFirst),
    ("henkanForward", Function::HenkanForward),
    ("henkanBackward", Function::HenkanBackward),
    ("purgeCandidate", Function::PurgeCandidate),
    ("henkanInput", Function::HenkanInput),
    ("kanaInput", Function::KanaInput),
    ("kakuteiFeed", Function::KakuteiFeed),
    ("henkanPoint", Function::HenkanPoint),
    ("deleteChar", Function::DeleteChar),
    ("abbrev", Function::Abbrev),
    ("hirakana", Function::Hirakana),
    ("katakana", Function::Katakana),
    ("hankatakana", Function::Hankatakana),
    ("zenkaku", Function::Zenkaku),
    ("latin", Function::Latin),
];

impl FromStr for Function {
    type Err = KanaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some(("upper", arg)) if !arg.is_empty() => Ok(Function::Upper(arg.to_string())),
            Some(_) => Err(KanaError::UnknownFunction(s.to_string())),
            None => NAMED
                .iter()
                .find(|(name, _)| *name == s)
                .map(|(_, f)| f.clone())
                .ok_or_else(|| KanaError::UnknownFunction(s.to_string())),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Function::Upper(arg) = self {
            return write!(f, "upper-{arg}");
        }
        let name = NAMED
            .iter()
            .find(|(_, func)| func == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown");
        f.write_str(name)
    }
}
