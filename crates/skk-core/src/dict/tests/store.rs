use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use crate::dict::*;
use crate::encoding::TextEncoding;
use crate::kana::{KanaOutput, KanaTable};

const GLOBAL: &str = "\
;; okuri-ari entries.
おくr /送/贈/
;; okuri-nasi entries.
かんじ /漢字/感じ/幹事/
かんさ /監査/
にほんご /日本語/
";

fn make_store() -> DictionaryStore {
    DictionaryStore::new(UserDictionary::new(), vec![SkkJisyo::parse(GLOBAL)])
}

#[test]
fn lookup_merges_user_before_global() {
    let store = DictionaryStore::new(
        UserDictionary::from_jisyo(SkkJisyo::parse("かんじ /感じ/寛治/\n")),
        vec![SkkJisyo::parse(GLOBAL)],
    );
    assert_eq!(
        store.lookup(HenkanType::OkuriNasi, "かんじ"),
        vec!["感じ", "寛治", "漢字", "幹事"]
    );
}

#[test]
fn lookup_is_idempotent() {
    let store = make_store();
    let first = store.lookup(HenkanType::OkuriNasi, "かんじ");
    let second = store.lookup(HenkanType::OkuriNasi, "かんじ");
    assert_eq!(first, second);
    assert!(store.lookup(HenkanType::OkuriNasi, "ないよ").is_empty());
}

#[test]
fn lookup_respects_partition() {
    let store = make_store();
    assert_eq!(store.lookup(HenkanType::OkuriAri, "おくr"), vec!["送", "贈"]);
    assert!(store.lookup(HenkanType::OkuriNasi, "おくr").is_empty());
}

#[test]
fn register_moves_candidate_to_front() {
    let store = make_store();
    store.register(HenkanType::OkuriNasi, "かんじ", "幹事");
    assert_eq!(store.lookup(HenkanType::OkuriNasi, "かんじ")[0], "幹事");
    store.register(HenkanType::OkuriNasi, "かんじ", "感じ");
    assert_eq!(
        store.lookup(HenkanType::OkuriNasi, "かんじ"),
        vec!["感じ", "幹事", "漢字"]
    );
}

#[test]
fn register_new_word() {
    let store = make_store();
    store.register(HenkanType::OkuriNasi, "すとあ", "ストア");
    assert_eq!(store.lookup(HenkanType::OkuriNasi, "すとあ"), vec!["ストア"]);
    assert_eq!(store.ranks("すと"), vec![("ストア".to_string(), 1)]);
    assert_eq!(store.status(), StoreStatus::Ok);
}

#[test]
fn register_rejects_unstorable() {
    let store = make_store();
    store.register(HenkanType::OkuriNasi, "すとあ", "a/b");
    assert!(store.lookup(HenkanType::OkuriNasi, "すとあ").is_empty());
    assert!(matches!(store.status(), StoreStatus::RegistrationFailed(_)));
}

#[test]
fn register_rejects_tabs() {
    let store = make_store();
    store.register(HenkanType::OkuriNasi, "すとあ", "tab\there");
    assert!(matches!(store.status(), StoreStatus::RegistrationFailed(_)));
    store.register(HenkanType::OkuriNasi, "す\tとあ", "ストア");
    assert!(matches!(store.status(), StoreStatus::RegistrationFailed(_)));
    assert!(store.ranks("す").is_empty());
}

#[test]
fn rank_orders_lookup() {
    let mut ranks = RankTable::new();
    ranks.bump("かんじ", "幹事");
    ranks.bump("かんじ", "感じ");
    let store = make_store().with_ranks(ranks, None);
    assert_eq!(
        store.lookup(HenkanType::OkuriNasi, "かんじ"),
        vec!["感じ", "幹事", "漢字"]
    );
}

#[test]
fn purge_removes_from_user() {
    let store = make_store();
    store.register(HenkanType::OkuriNasi, "すとあ", "ストア");
    store.purge(HenkanType::OkuriNasi, "すとあ", "ストア");
    assert!(store.lookup(HenkanType::OkuriNasi, "すとあ").is_empty());
    assert!(store.ranks("すとあ").is_empty());
}

#[test]
fn completion_from_local_sources() {
    let store = make_store();
    let table = KanaTable::default();
    let result = store.completion("かん", "", &table);
    assert_eq!(
        result,
        vec![
            ("かんさ".to_string(), vec!["監査".to_string()]),
            (
                "かんじ".to_string(),
                vec!["漢字".to_string(), "感じ".to_string(), "幹事".to_string()]
            ),
        ]
    );
}

#[test]
fn completion_expands_feed() {
    let store = make_store();
    let table = KanaTable::from_entries(vec![
        ("sa".into(), Some(KanaOutput::kana("さ"))),
        ("si".into(), Some(KanaOutput::kana("し"))),
    ]);
    let result = store.completion("かん", "s", &table);
    assert_eq!(result, vec![("かんさ".to_string(), vec!["監査".to_string()])]);
}

#[test]
fn save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let global_path = dir.path().join("SKK-JISYO.S");
    std::fs::write(&global_path, TextEncoding::EucJp.encode(GLOBAL)).unwrap();
    let opts = StoreOptions {
        global: vec![(global_path, TextEncoding::EucJp)],
        user: Some((dir.path().join("user-jisyo"), TextEncoding::Utf8)),
        rank_file: Some(dir.path().join("rank.tsv")),
        server: None,
        immediately_save: false,
    };

    let store = DictionaryStore::open(&opts);
    assert_eq!(store.lookup(HenkanType::OkuriNasi, "にほんご"), vec!["日本語"]);
    store.register(HenkanType::OkuriNasi, "すとあ", "ストア");
    store.save().unwrap();

    let reopened = DictionaryStore::open(&opts);
    assert_eq!(reopened.lookup(HenkanType::OkuriNasi, "すとあ"), vec!["ストア"]);
    assert_eq!(reopened.ranks("す"), vec![("ストア".to_string(), 1)]);
}

#[test]
fn immediate_save_writes_on_register() {
    let dir = tempfile::tempdir().unwrap();
    let user_path = dir.path().join("user-jisyo");
    let opts = StoreOptions {
        user: Some((user_path.clone(), TextEncoding::Utf8)),
        immediately_save: true,
        ..StoreOptions::default()
    };
    let store = DictionaryStore::open(&opts);
    store.register(HenkanType::OkuriNasi, "すとあ", "ストア");
    let text = std::fs::read_to_string(&user_path).unwrap();
    assert!(text.contains("すとあ /ストア/"));
}

#[test]
fn persistence_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let opts = StoreOptions {
        // Parent is a regular file, so the write must fail.
        user: Some((blocker.join("user-jisyo"), TextEncoding::Utf8)),
        immediately_save: true,
        ..StoreOptions::default()
    };
    let store = DictionaryStore::open(&opts);
    store.register(HenkanType::OkuriNasi, "すとあ", "ストア");
    assert!(matches!(store.status(), StoreStatus::RegistrationFailed(_)));
    // The in-memory registration still took effect.
    assert_eq!(store.lookup(HenkanType::OkuriNasi, "すとあ"), vec!["ストア"]);
}

#[test]
fn missing_global_dictionary_is_skipped() {
    let opts = StoreOptions {
        global: vec![("/nonexistent/SKK-JISYO.L".into(), TextEncoding::EucJp)],
        ..StoreOptions::default()
    };
    let store = DictionaryStore::open(&opts);
    assert!(store.lookup(HenkanType::OkuriNasi, "かんじ").is_empty());
}

#[test]
fn server_results_follow_local() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        while stream.read(&mut byte).unwrap_or(0) == 1 {
            if byte[0] == b' ' {
                let req = TextEncoding::EucJp.decode(&buf);
                buf.clear();
                let resp = if req == "1かんじ" { "1/漢字/監事/\n" } else { "4\n" };
                stream.write_all(&TextEncoding::EucJp.encode(resp)).unwrap();
            } else if buf.is_empty() && byte[0] == b'0' {
                break;
            } else {
                buf.push(byte[0]);
            }
        }
    });
    let server = SkkServer::new(ServerOptions {
        host: "127.0.0.1".into(),
        port,
        request_encoding: TextEncoding::EucJp,
        response_encoding: TextEncoding::EucJp,
    });
    let store = make_store().with_server(server);
    assert_eq!(
        store.lookup(HenkanType::OkuriNasi, "かんじ"),
        vec!["漢字", "感じ", "幹事", "監事"]
    );
    drop(store);
    handle.join().unwrap();
}

#[test]
fn unreachable_server_degrades_to_local() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let opts = StoreOptions {
        server: Some(ServerOptions {
            host: "127.0.0.1".into(),
            port,
            request_encoding: TextEncoding::EucJp,
            response_encoding: TextEncoding::EucJp,
        }),
        ..StoreOptions::default()
    };
    let store = DictionaryStore::open(&opts);
    assert!(store.lookup(HenkanType::OkuriNasi, "かんじ").is_empty());
    assert!(store.server().is_some());
}

#[test]
fn reopen_keeps_ranks_around_bad_lines() {
    let dir = tempfile::tempdir().unwrap();
    let rank_path = dir.path().join("rank.tsv");
    let opts = StoreOptions {
        global: Vec::new(),
        user: Some((dir.path().join("user-jisyo"), TextEncoding::Utf8)),
        rank_file: Some(rank_path.clone()),
        server: None,
        immediately_save: false,
    };

    let store = DictionaryStore::open(&opts);
    store.register(HenkanType::OkuriNasi, "かんじ", "漢字");
    store.register(HenkanType::OkuriNasi, "かんじ", "tab\there");
    store.save().unwrap();

    // A line written by hand or by an older build.
    let mut text = std::fs::read_to_string(&rank_path).unwrap();
    text.push_str("かんじ\tbad\tline\t9\n");
    std::fs::write(&rank_path, text).unwrap();

    let reopened = DictionaryStore::open(&opts);
    assert_eq!(reopened.ranks("かんじ"), vec![("漢字".to_string(), 1)]);
}
