fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_toml(
        "src/kana/default_romaji.toml",
        include_str!("src/kana/default_romaji.toml"),
    );
}

fn validate_toml(path: &str, content: &str) {
    let value = match content.parse::<toml::Value>() {
        Ok(v) => v,
        Err(_) => panic!("{path} contains invalid TOML"),
    };
    if path.ends_with("default_romaji.toml") && value.get("mappings").is_none() {
        panic!("{path} has no [mappings] table");
    }
}
