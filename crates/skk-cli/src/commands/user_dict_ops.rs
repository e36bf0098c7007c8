use std::path::Path;
use std::process;

use skk_core::dict::{classify, HenkanType, UserDictionary};
use skk_core::encoding::TextEncoding;

use super::pad;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

fn open(path: &Path, encoding: TextEncoding) -> UserDictionary {
    die!(
        UserDictionary::open(path, encoding),
        "Error opening user dictionary: {}"
    )
}

pub fn user_dict_add(path: &Path, encoding: TextEncoding, word: &str, candidate: &str) {
    let dict = open(path, encoding);
    let kind = classify(word);
    if dict.register(kind, word, candidate) {
        die!(dict.save(), "Error saving user dictionary: {}");
        println!("Added: {word} /{candidate}/ ({kind})");
    } else {
        println!("Already first: {word} /{candidate}/");
    }
}

pub fn user_dict_remove(path: &Path, encoding: TextEncoding, word: &str, candidate: &str) {
    let dict = open(path, encoding);
    if dict.purge(classify(word), word, candidate) {
        die!(dict.save(), "Error saving user dictionary: {}");
        println!("Removed: {word} /{candidate}/");
    } else {
        println!("Not found: {word} /{candidate}/");
    }
}

pub fn user_dict_list(path: &Path, encoding: TextEncoding) {
    let dict = open(path, encoding);
    if dict.is_empty() {
        println!("(empty)");
        return;
    }
    let mut total = 0;
    for kind in [HenkanType::OkuriAri, HenkanType::OkuriNasi] {
        let entries = dict.list(kind);
        if entries.is_empty() {
            continue;
        }
        println!(";; {kind} entries.");
        for (word, candidates) in &entries {
            println!("{}  /{}/", pad(word, 12), candidates.join("/"));
        }
        total += entries.len();
    }
    println!("---");
    println!("{total} headwords");
}
