#![cfg(feature = "engine-pcre2")]

use polyre_engine::{CompileFailure, Engine, Flags, Flavor, MatcherConfig, Pcre2Engine};

#[test]
fn backreference_matches() {
    let m = Pcre2Engine::new(Flavor::Text)
        .compile(r"(a)\1", MatcherConfig::default())
        .unwrap();
    let out = m.search_at(b"xaa", 0).unwrap().unwrap();
    assert_eq!(out.bounds(), (1, 3));
    assert_eq!(out.span(1), Some((1, 2)));
}

#[test]
fn sticky_uses_search_start_anchor() {
    let m = Pcre2Engine::new(Flavor::Text)
        .compile("b", MatcherConfig::default().with_sticky(true))
        .unwrap();
    assert!(m.execute(b"ab", 0).unwrap().is_none());
    assert_eq!(m.execute(b"ab", 1).unwrap().unwrap().bounds(), (1, 2));
    // свободный поиск у того же матчера доступен лениво
    assert_eq!(m.search_at(b"ab", 0).unwrap().unwrap().bounds(), (1, 2));
}

#[test]
fn look_behind_and_names() {
    let m = Pcre2Engine::new(Flavor::Text)
        .compile(r"(?<=a)(?P<tail>b)", MatcherConfig::default())
        .unwrap();
    let out = m.search_at(b"cbab", 0).unwrap().unwrap();
    assert_eq!(out.bounds(), (3, 4));
    assert_eq!(m.group_names().get("tail"), Some(1));
    assert_eq!(m.captures_len(), 2);
}

#[test]
fn unmatched_group_has_no_span() {
    let m = Pcre2Engine::new(Flavor::Bytes)
        .compile("(a)(b)?", MatcherConfig::default())
        .unwrap();
    let out = m.search_at(b"a", 0).unwrap().unwrap();
    assert_eq!(out.span(2), None);
    assert_eq!(out.group_count(), 3);
}

#[test]
fn caseless_flag() {
    let m = Pcre2Engine::new(Flavor::Text)
        .with_jit(false)
        .compile("abc", MatcherConfig::new(Flags::IGNORECASE))
        .unwrap();
    assert!(m.search_at(b"ABC", 0).unwrap().is_some());
}

#[test]
fn syntax_error_carries_position() {
    match Pcre2Engine::new(Flavor::Text).compile("ab(", MatcherConfig::default()) {
        Err(CompileFailure::Syntax { message }) => {
            assert!(message.contains(" at position "), "{message}");
        }
        Err(other) => panic!("unexpected failure: {other}"),
        Ok(_) => panic!("pattern must not compile"),
    }
}
