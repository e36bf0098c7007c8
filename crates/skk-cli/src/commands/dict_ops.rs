use std::path::Path;
use std::process;

use serde::Serialize;

use skk_core::dict::{
    classify, strip_annotation, DictionaryStore, ServerOptions, SkkJisyo, SkkServer,
    UserDictionary,
};
use skk_core::encoding::TextEncoding;
use skk_core::kana::KanaTables;
use skk_core::settings::Settings;

use super::pad;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
struct CandidateJson<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LookupJson<'a> {
    word: &'a str,
    kind: String,
    candidates: Vec<CandidateJson<'a>>,
}

fn candidate_json(c: &str) -> CandidateJson<'_> {
    let text = strip_annotation(c);
    CandidateJson {
        text,
        annotation: c.get(text.len() + 1..).filter(|a| !a.is_empty()),
    }
}

/// Explicit dictionary files replace the configured sources; otherwise the
/// store is opened from settings (user dictionary, globals, server).
pub fn open_store(settings: &Settings, dicts: &[String], encoding: TextEncoding) -> DictionaryStore {
    if dicts.is_empty() {
        return DictionaryStore::from_settings(settings);
    }
    let global = dicts
        .iter()
        .map(|d| {
            die!(
                SkkJisyo::load(Path::new(d), encoding),
                "Error opening dictionary {d}: {}"
            )
        })
        .collect();
    DictionaryStore::new(UserDictionary::new(), global)
}

pub fn lookup(store: &DictionaryStore, word: &str, json: bool) {
    let kind = classify(word);
    let candidates = store.lookup(kind, word);
    if json {
        let out = LookupJson {
            word,
            kind: kind.to_string(),
            candidates: candidates.iter().map(|c| candidate_json(c)).collect(),
        };
        println!("{}", die!(serde_json::to_string_pretty(&out), "Error: {}"));
        return;
    }
    if candidates.is_empty() {
        println!("{word} ({kind}): not found");
        return;
    }
    println!("{word} ({kind}): {} candidates", candidates.len());
    for (i, c) in candidates.iter().enumerate() {
        let text = strip_annotation(c);
        match c.get(text.len() + 1..).filter(|a| !a.is_empty()) {
            Some(annotation) => println!("  {:>2}. {}  ; {annotation}", i + 1, pad(text, 12)),
            None => println!("  {:>2}. {text}", i + 1),
        }
    }
}

/// Okuri-nasi headwords under `prefix`, with `feed` expanded through the
/// configured kana table.
pub fn complete(store: &DictionaryStore, settings: &Settings, prefix: &str, feed: &str, json: bool) {
    let mut tables = KanaTables::new();
    let files = settings.dictionary.kana_table_files();
    if !files.is_empty() {
        die!(tables.load_files(&files), "Error loading kana tables: {}");
    }
    let table = die!(tables.get(&settings.input.kana_table), "Error: {}");
    let data = store.completion(prefix, feed, table);
    if json {
        let out: Vec<LookupJson<'_>> = data
            .iter()
            .map(|(word, cands)| LookupJson {
                word,
                kind: classify(word).to_string(),
                candidates: cands.iter().map(|c| candidate_json(c)).collect(),
            })
            .collect();
        println!("{}", die!(serde_json::to_string_pretty(&out), "Error: {}"));
        return;
    }
    if data.is_empty() {
        println!("(no completions)");
        return;
    }
    let width = data
        .iter()
        .map(|(w, _)| unicode_width::UnicodeWidthStr::width(w.as_str()))
        .max()
        .unwrap_or(0);
    for (word, cands) in &data {
        let shown: Vec<&str> = cands.iter().map(|c| strip_annotation(c)).collect();
        println!("{}  /{}/", pad(word, width), shown.join("/"));
    }
    println!("---");
    println!("{} headwords", data.len());
}

pub struct ServerArgs<'a> {
    pub host: &'a str,
    pub port: u16,
    pub encoding: TextEncoding,
}

/// Query a dictionary server directly: `1word` lookup, or `4prefix`
/// listing with `list_prefix`.
pub fn server_lookup(args: &ServerArgs<'_>, word: &str, list_prefix: bool) {
    let server = SkkServer::new(ServerOptions {
        host: args.host.to_string(),
        port: args.port,
        request_encoding: args.encoding,
        response_encoding: args.encoding,
    });
    die!(
        server.connect(),
        "Error connecting to {}:{}: {}",
        args.host,
        args.port
    );
    let results = if list_prefix {
        server.midashis(word)
    } else {
        server.lookup(word)
    };
    server.close();
    if results.is_empty() {
        println!("{word}: not found");
    } else {
        for r in &results {
            println!("{r}");
        }
    }
}
