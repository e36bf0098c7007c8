use std::fs;
use std::path::Path;
use std::process;

use skk_core::encoding::TextEncoding;
use skk_core::kana::{load_kana_file, parse_kana_toml, KanaOutput};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn kana_export() {
    print!("{}", skk_core::kana::DEFAULT_TOML);
}

/// Accepts a `[mappings]` TOML file, or a line-based table in `encoding`
/// for any other extension.
pub fn kana_validate(file: &str, encoding: TextEncoding) {
    let path = Path::new(file);
    let entries = if path.extension().is_some_and(|e| e == "toml") {
        let content = die!(fs::read_to_string(path), "Error reading {file}: {}");
        die!(parse_kana_toml(&content), "Error: {}")
    } else {
        die!(load_kana_file(path, encoding), "Error: {}")
    };
    let mut kana = 0;
    let mut actions = 0;
    let mut deletions = 0;
    for (_, output) in &entries {
        match output {
            Some(KanaOutput::Kana { .. }) => kana += 1,
            Some(KanaOutput::Action(_)) => actions += 1,
            None => deletions += 1,
        }
    }
    println!("OK: {kana} kana, {actions} functions, {deletions} deletions");
}

pub fn settings_export() {
    print!("{}", skk_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        skk_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: input.kana_table={}, candidates.show_candidates_count={}, dictionary.global={}, server.enabled={}",
        s.input.kana_table,
        s.candidates.show_candidates_count,
        s.dictionary.global.len(),
        s.server.enabled
    );
}
