pub mod config_ops;
pub mod convert_ops;
pub mod dict_ops;
pub mod user_dict_ops;

use std::path::Path;
use std::process;

use skk_core::settings::{load_settings, Settings};

/// Settings from `path`, or the embedded defaults.
pub fn settings_or_default(path: Option<&str>) -> Settings {
    match path {
        Some(p) => load_settings(Path::new(p)).unwrap_or_else(|e| {
            eprintln!("Error loading settings: {e}");
            process::exit(1);
        }),
        None => Settings::default(),
    }
}

/// Right-pad `s` to `width` terminal columns.
pub fn pad(s: &str, width: usize) -> String {
    use unicode_width::UnicodeWidthStr;
    let w = UnicodeWidthStr::width(s);
    if w < width {
        format!("{s}{}", " ".repeat(width - w))
    } else {
        s.to_string()
    }
}
