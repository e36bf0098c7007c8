use super::*;
use crate::host::KeyRead;
use crate::types::InputState;

fn index(s: &InputSession) -> isize {
    match s.state() {
        InputState::Converting(c) => c.index,
        other => panic!("not converting: {other:?}"),
    }
}

#[test]
fn forward_visits_inline_then_pages() {
    let mut s = make_session();
    let mut host = ScriptedHost::default();
    type_string(&mut s, &mut host, "Takusan ");
    let mut seen = vec![index(&s)];
    for _ in 0..5 {
        type_string(&mut s, &mut host, " ");
        seen.push(index(&s));
    }
    assert_eq!(seen, vec![0, 1, 2, 3, 10, 17]);
    assert_eq!(host.shown.len(), 2);
    assert_eq!(host.shown[0][0], "a: 候補05");
    assert_eq!(host.shown[0][6], "l: 候補11");
    assert_eq!(host.shown[1][0], "a: 候補12");

    // The partial last page holds the tail of the list.
    type_string(&mut s, &mut host, " ");
    assert_eq!(index(&s), 19);
    assert_eq!(host.shown[2], vec!["a: 候補19", "s: 候補20"]);
    assert!(host.prompts.is_empty());

    // Exhausted: registration is declined and the index stays put.
    type_string(&mut s, &mut host, " ");
    assert_eq!(index(&s), 19);
    assert_eq!(host.prompts, vec!["[辞書登録] たくさん: "]);

    type_string(&mut s, &mut host, "x");
    assert_eq!(index(&s), 17);
    type_string(&mut s, &mut host, "x");
    assert_eq!(index(&s), 10);
    type_string(&mut s, &mut host, "x");
    assert_eq!(index(&s), 3);
    assert_eq!(s.display(), "▼候補04");
}

#[test]
fn select_key_on_popup_page() {
    let mut s = make_session();
    let mut host = ScriptedHost::default();
    let out = type_string(&mut s, &mut host, "Takusan     d");
    assert_eq!(render(&out), "候補07");
    assert!(s.state().is_idle());
}

#[test]
fn non_select_key_on_page_commits_and_types() {
    let mut s = make_session();
    let out = type_string(&mut s, &mut ScriptedHost::default(), "Takusan     i");
    assert_eq!(render(&out), "候補11い");
}

#[test]
fn tail_of_list_is_selectable_from_popup() {
    let mut s = make_session();
    let mut host = ScriptedHost::default();
    let out = type_string(&mut s, &mut host, "Takusan       s");
    assert_eq!(render(&out), "候補20");
    assert!(host.prompts.is_empty());
}

/// Six candidates: the inline run covers four, the page holds the rest.
fn six_candidate_session(use_popup: bool) -> InputSession {
    let jisyo = SkkJisyo::parse(";; okuri-nasi entries.\nかい /1/2/3/4/5/6/\n");
    let mut settings = Settings::default();
    settings.candidates.use_popup = use_popup;
    InputSession::new(
        Arc::new(settings),
        Arc::new(RwLock::new(KanaTables::default())),
        Arc::new(RwLock::new(KeyMaps::default())),
        Arc::new(DictionaryStore::new(UserDictionary::new(), vec![jisyo])),
    )
}

#[test]
fn short_list_shows_partial_page_before_registering() {
    let mut s = six_candidate_session(true);
    let mut host = ScriptedHost::default();
    type_string(&mut s, &mut host, "Kai    ");
    assert_eq!(s.display(), "▼4");
    assert!(host.shown.is_empty());

    type_string(&mut s, &mut host, " ");
    assert_eq!(index(&s), 5);
    assert_eq!(host.shown, vec![vec!["a: 5".to_string(), "s: 6".to_string()]]);
    assert!(host.prompts.is_empty());

    type_string(&mut s, &mut host, " ");
    assert_eq!(host.prompts, vec!["[辞書登録] かい: "]);
    assert_eq!(index(&s), 5);

    let out = type_string(&mut s, &mut host, "a");
    assert_eq!(render(&out), "5");
}

#[test]
fn short_list_interactive_page() {
    let mut s = six_candidate_session(false);
    let mut host = ScriptedHost {
        keys: [KeyRead::Key('s')].into(),
        ..ScriptedHost::default()
    };
    let out = type_string(&mut s, &mut host, "Kai     ");
    assert_eq!(render(&out), "6");
    assert_eq!(host.prompts, vec!["a: 5  s: 6 [残り 0]"]);
}

fn interactive_session() -> InputSession {
    make_session_with(|st| st.candidates.use_popup = false)
}

#[test]
fn interactive_next_page_then_select() {
    let mut s = interactive_session();
    let mut host = ScriptedHost {
        keys: [KeyRead::Key(' '), KeyRead::Key('d')].into(),
        ..ScriptedHost::default()
    };
    let out = type_string(&mut s, &mut host, "Takusan     ");
    assert_eq!(render(&out), "候補14");
    assert_eq!(host.prompts[0], "a: 候補05  s: 候補06  d: 候補07  f: 候補08  j: 候補09  k: 候補10  l: 候補11 [残り 9]");
}

#[test]
fn interactive_reaches_partial_last_page() {
    let mut s = interactive_session();
    let mut host = ScriptedHost {
        keys: [
            KeyRead::Key(' '),
            KeyRead::Key(' '),
            KeyRead::Key('s'),
        ]
        .into(),
        ..ScriptedHost::default()
    };
    let out = type_string(&mut s, &mut host, "Takusan     ");
    assert_eq!(render(&out), "候補20");
}

#[test]
fn interactive_ignores_out_of_range_keys() {
    let mut s = interactive_session();
    let mut host = ScriptedHost {
        keys: [
            KeyRead::Key(' '),
            KeyRead::Key(' '),
            KeyRead::Key('l'),
            KeyRead::Key('z'),
            KeyRead::Key('a'),
        ]
        .into(),
        ..ScriptedHost::default()
    };
    let out = type_string(&mut s, &mut host, "Takusan     ");
    assert_eq!(render(&out), "候補19");
}

#[test]
fn interactive_back_to_inline() {
    let mut s = interactive_session();
    let mut host = ScriptedHost {
        keys: [KeyRead::Key('x')].into(),
        ..ScriptedHost::default()
    };
    type_string(&mut s, &mut host, "Takusan     ");
    assert_eq!(index(&s), 3);
    assert_eq!(s.display(), "▼候補04");
}

#[test]
fn interactive_interrupt_cancels() {
    let mut s = interactive_session();
    let mut host = ScriptedHost::default();
    let out = type_string(&mut s, &mut host, "Takusan     ");
    assert_eq!(render(&out), "");
    assert!(s.state().is_idle());
}

#[test]
fn interactive_interrupt_keeps_state() {
    let mut s = make_session_with(|st| {
        st.candidates.use_popup = false;
        st.input.immediately_cancel = false;
    });
    type_string(&mut s, &mut ScriptedHost::default(), "Takusan     ");
    assert_eq!(index(&s), 10);
}

#[test]
fn command_line_mode_uses_interactive_pages() {
    let mut s = make_session();
    s.set_host_mode("c");
    let mut host = ScriptedHost {
        keys: [KeyRead::Key('a')].into(),
        ..ScriptedHost::default()
    };
    let out = type_string(&mut s, &mut host, "Takusan     ");
    assert_eq!(render(&out), "候補05");
    assert!(host.shown.is_empty());
}
