use skk_core::dict::HenkanType;

use super::*;
use crate::types::{Affix, InputState};
use crate::NullHost;

fn index(s: &InputSession) -> Option<isize> {
    match s.state() {
        InputState::Converting(c) => Some(c.index),
        _ => None,
    }
}

#[test]
fn nihongo_converts() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "Nihongo ");
    assert_eq!(s.display(), "▼日本語");
    assert_eq!(typed("Nihongo \n"), "日本語");
}

#[test]
fn commit_records_last_candidate() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "Kanji  \n");
    let last = s.last_candidate().unwrap();
    assert_eq!(last.kind, HenkanType::OkuriNasi);
    assert_eq!(last.word, "かんじ");
    assert_eq!(last.candidate, "感じ");
}

#[test]
fn okuri_converts_when_complete() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "OkuRu");
    assert_eq!(s.display(), "▼送る");
    assert_eq!(render(&type_string(&mut s, &mut NullHost, "\n")), "送る");
}

#[test]
fn okuri_with_sokuon() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "TukaTta");
    assert_eq!(s.display(), "▼使った");
    match s.state() {
        InputState::Converting(c) => assert_eq!(c.word, "つかt"),
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn okuri_waits_without_immediate_convert() {
    let mut s = make_session_with(|st| st.input.immediately_okuri_convert = false);
    type_string(&mut s, &mut NullHost, "OkuRu");
    assert_eq!(s.display(), "▽おく*る");
    type_string(&mut s, &mut NullHost, " ");
    assert_eq!(s.display(), "▼送る");
}

#[test]
fn forward_and_backward() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "A ");
    assert_eq!(s.display(), "▼亜");
    type_string(&mut s, &mut NullHost, " ");
    assert_eq!(s.display(), "▼阿");
    type_string(&mut s, &mut NullHost, "x");
    assert_eq!(s.display(), "▼亜");
    type_string(&mut s, &mut NullHost, "x");
    assert_eq!(s.display(), "▽あ");
}

#[test]
fn empty_reading_never_converts() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "; ");
    assert_eq!(s.display(), "▽");
    assert_eq!(index(&s), None);
}

#[test]
fn two_stage_cancel() {
    let mut s = make_session_with(|st| st.input.immediately_cancel = false);
    let mut out = type_string(&mut s, &mut NullHost, "A ");
    out.push_str(&type_string(&mut s, &mut NullHost, "\x07"));
    assert_eq!(s.display(), "▽あ");
    out.push_str(&type_string(&mut s, &mut NullHost, "\x07"));
    assert_eq!(render(&out), "");
    assert!(s.state().is_idle());
}

#[test]
fn immediate_cancel() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "A \x07");
    assert!(s.state().is_idle());
}

#[test]
fn typing_commits_current_candidate() {
    assert_eq!(typed("A i"), "亜い");
    assert_eq!(typed("A Ii"), "亜▽いい");
}

#[test]
fn backspace_after_commit() {
    assert_eq!(typed("Kanji \x08"), "漢");
}

#[test]
fn commit_learns_candidate() {
    let mut s = make_session();
    let mut host = NullHost;
    type_string(&mut s, &mut host, "A  \n");
    type_string(&mut s, &mut host, "A ");
    assert_eq!(s.display(), "▼阿");
    assert_eq!(
        s.store().lookup(HenkanType::OkuriNasi, "あ"),
        vec!["阿", "亜"]
    );
}

#[test]
fn registration_on_exhaustion() {
    let mut s = make_session();
    let mut host = ScriptedHost {
        word: Some("ストア".into()),
        ..ScriptedHost::default()
    };
    let out = type_string(&mut s, &mut host, "Sutoa ");
    assert_eq!(render(&out), "ストア");
    assert_eq!(host.prompts, vec!["[辞書登録] すとあ: "]);
    assert_eq!(
        s.store().lookup(HenkanType::OkuriNasi, "すとあ"),
        vec!["ストア"]
    );
}

#[test]
fn declined_registration_rewinds() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "Sutoa ");
    assert_eq!(s.display(), "▽すとあ");

    type_string(&mut s, &mut NullHost, "\x07A  ");
    assert_eq!(s.display(), "▼阿");
    // Past the last candidate: the prompt is declined and the index stays.
    type_string(&mut s, &mut NullHost, " ");
    assert_eq!(s.display(), "▼阿");
    assert_eq!(index(&s), Some(1));
}

#[test]
fn okuri_registration_prompt_shows_tail() {
    let mut s = make_session();
    let mut host = ScriptedHost::default();
    type_string(&mut s, &mut host, "HasiRu");
    assert_eq!(host.prompts, vec!["[辞書登録] はし*る: "]);
    assert_eq!(s.display(), "▽はし*る");
}

#[test]
fn purge_removes_user_word() {
    let mut s = make_session();
    let mut host = ScriptedHost {
        word: Some("ストア".into()),
        ..ScriptedHost::default()
    };
    type_string(&mut s, &mut host, "Sutoa ");

    host.confirm = false;
    type_string(&mut s, &mut host, "Sutoa X");
    assert_eq!(s.display(), "▼ストア");

    host.confirm = true;
    type_string(&mut s, &mut host, "X");
    assert!(s.state().is_idle());
    assert!(s
        .store()
        .lookup(HenkanType::OkuriNasi, "すとあ")
        .is_empty());
}

#[test]
fn prefix_affix() {
    let mut s = make_session();
    type_string(&mut s, &mut NullHost, "Tyou>");
    assert_eq!(s.display(), "▼超");
    let out = type_string(&mut s, &mut NullHost, "\n");
    assert_eq!(render(&out), "超▽");
    match s.state() {
        InputState::Composing(c) => assert_eq!(c.affix, None),
        other => panic!("unexpected state {other:?}"),
    }
}

#[test]
fn suffix_affix() {
    let mut s = make_session();
    let out = type_string(&mut s, &mut NullHost, "A >");
    assert_eq!(render(&out), "亜▽>");
    match s.state() {
        InputState::Composing(c) => assert_eq!(c.affix, Some(Affix::Suffix)),
        other => panic!("unexpected state {other:?}"),
    }
    type_string(&mut s, &mut NullHost, "teki ");
    assert_eq!(s.display(), "▼的");
}

#[test]
fn kakutei_in_converting_commits() {
    assert_eq!(typed("Kanji\n"), "かんじ");
    assert_eq!(typed("Kanji   \n"), "幹事");
}
