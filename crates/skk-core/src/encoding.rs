//! Text encodings used by dictionary files, kana table files and the
//! dictionary server protocol.

use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoding, EUC_JP, ISO_2022_JP, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Try UTF-8 first, fall back to EUC-JP (the traditional jisyo encoding).
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "euc-jp", alias = "eucjp")]
    EucJp,
    #[serde(rename = "sjis", alias = "shift_jis")]
    Sjis,
    #[serde(rename = "jis", alias = "iso-2022-jp")]
    Jis,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "utf-16be")]
    Utf16Be,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown encoding: {0}")]
pub struct UnknownEncoding(pub String);

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let enc = match s.to_ascii_lowercase().as_str() {
            "auto" => TextEncoding::Auto,
            "utf-8" | "utf8" => TextEncoding::Utf8,
            "euc-jp" | "eucjp" => TextEncoding::EucJp,
            "sjis" | "shift_jis" => TextEncoding::Sjis,
            "jis" | "iso-2022-jp" => TextEncoding::Jis,
            "utf-16le" => TextEncoding::Utf16Le,
            "utf-16be" => TextEncoding::Utf16Be,
            _ => return Err(UnknownEncoding(s.to_string())),
        };
        Ok(enc)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Auto => "auto",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::EucJp => "euc-jp",
            TextEncoding::Sjis => "sjis",
            TextEncoding::Jis => "jis",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        };
        f.write_str(name)
    }
}

impl TextEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::Auto | TextEncoding::Utf8 => UTF_8,
            TextEncoding::EucJp => EUC_JP,
            TextEncoding::Sjis => SHIFT_JIS,
            TextEncoding::Jis => ISO_2022_JP,
            TextEncoding::Utf16Le => UTF_16LE,
            TextEncoding::Utf16Be => UTF_16BE,
        }
    }

    /// Decode bytes, replacing malformed sequences with U+FFFD.
    ///
    /// `Auto` decodes as UTF-8 when the input is valid UTF-8 and as EUC-JP
    /// otherwise.
    pub fn decode(self, bytes: &[u8]) -> String {
        if self == TextEncoding::Auto {
            return match std::str::from_utf8(bytes) {
                Ok(s) => s.to_string(),
                Err(_) => EUC_JP.decode_without_bom_handling(bytes).0.into_owned(),
            };
        }
        self.encoding()
            .decode_without_bom_handling(bytes)
            .0
            .into_owned()
    }

    /// Encode text. Characters the target cannot represent become numeric
    /// character references, as `encoding_rs` does for legacy encodings.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            // encoding_rs only decodes UTF-16; its encoder falls back to UTF-8.
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            _ => self.encoding().encode(text).0.into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euc_jp_roundtrip() {
        let bytes = TextEncoding::EucJp.encode("かんじ");
        assert_eq!(bytes, vec![0xA4, 0xAB, 0xA4, 0xF3, 0xA4, 0xB8]);
        assert_eq!(TextEncoding::EucJp.decode(&bytes), "かんじ");
    }

    #[test]
    fn auto_detects_utf8_and_euc_jp() {
        assert_eq!(TextEncoding::Auto.decode("漢字".as_bytes()), "漢字");
        let euc = TextEncoding::EucJp.encode("漢字");
        assert_eq!(TextEncoding::Auto.decode(&euc), "漢字");
    }

    #[test]
    fn utf16_encoders() {
        assert_eq!(TextEncoding::Utf16Le.encode("あ"), vec![0x42, 0x30]);
        assert_eq!(TextEncoding::Utf16Be.encode("あ"), vec![0x30, 0x42]);
        assert_eq!(TextEncoding::Utf16Le.decode(&[0x42, 0x30]), "あ");
    }

    #[test]
    fn parse_names() {
        assert_eq!("EUC-JP".parse::<TextEncoding>().unwrap(), TextEncoding::EucJp);
        assert_eq!("shift_jis".parse::<TextEncoding>().unwrap(), TextEncoding::Sjis);
        assert!("latin1".parse::<TextEncoding>().is_err());
        assert_eq!(TextEncoding::Jis.to_string(), "jis");
    }
}
