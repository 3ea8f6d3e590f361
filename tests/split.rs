// path: tests/split.rs
mod helpers;

use helpers::{compile, compile_bytes};
use polyre::Haystack;

fn texts<'h>(parts: &[Option<&'h str>]) -> Vec<Option<Haystack<'h>>> {
    parts.iter().map(|p| p.map(Haystack::Text)).collect()
}

#[test]
fn plain_separator_keeps_empty_fields() {
    let out = compile(",").split("a,,b", 0).unwrap();
    assert_eq!(out, texts(&[Some("a"), Some(""), Some("b")]));
}

#[test]
fn groups_are_interleaved() {
    let out = compile("(,)").split("a,b", 0).unwrap();
    assert_eq!(out, texts(&[Some("a"), Some(","), Some("b")]));

    let out = compile("(,)|(;)").split("a,b;c", 0).unwrap();
    assert_eq!(
        out,
        texts(&[Some("a"), Some(","), None, Some("b"), None, Some(";"), Some("c")])
    );
}

#[test]
fn maxsplit_leaves_the_rest_whole() {
    let out = compile(",").split("a,b,c", 1).unwrap();
    assert_eq!(out, texts(&[Some("a"), Some("b,c")]));
}

#[test]
fn empty_matches_split_between_characters() {
    let out = compile("x*").split("axb", 0).unwrap();
    assert_eq!(out, texts(&[Some(""), Some("a"), Some(""), Some("b"), Some("")]));

    let out = compile("x*").split("", 0).unwrap();
    assert_eq!(out, texts(&[Some(""), Some("")]));
}

#[test]
fn no_match_returns_input() {
    let out = compile("z").split("abc", 0).unwrap();
    assert_eq!(out, texts(&[Some("abc")]));
}

#[test]
fn bytes_split() {
    let out = compile_bytes(b"\xff").split(b"a\xffb", 0).unwrap();
    assert_eq!(
        out,
        vec![Some(Haystack::Bytes(b"a")), Some(Haystack::Bytes(b"b"))]
    );
}
