pub mod dict;
pub mod encoding;
pub mod kana;
pub mod okuri;
pub mod settings;
pub mod unicode;
