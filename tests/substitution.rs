// path: tests/substitution.rs
mod helpers;

use helpers::{compile, compile_bytes};
use polyre::{Error, Match};

#[test]
fn numbered_and_named_backreferences() {
    let p = compile(r"(\w+) (?P<name>\w+)");
    let out = p.sub(r"\1-\g<name>", "ab cd", 0).unwrap();
    assert_eq!(out, "ab-cd");
    let out = p.sub(r"\g<2>/\g<0>", "ab cd", 0).unwrap();
    assert_eq!(out, "cd/ab cd");
}

#[test]
fn escaped_backslash_is_literal() {
    let out = compile("x").sub(r"\\", "axb", 0).unwrap();
    assert_eq!(out, "a\\b");
}

#[test]
fn control_escapes_expand() {
    let out = compile(",").sub(r"\n", "a,b", 0).unwrap();
    assert_eq!(out, "a\nb");
}

#[test]
fn out_of_range_group_fails() {
    let err = compile("(a)(b)").sub(r"\9", "ab", 0).unwrap_err();
    assert!(matches!(err, Error::InvalidBackreference { .. }));
    assert_eq!(err.to_string(), "invalid group reference 9 at position 0");
}

#[test]
fn unmatched_group_fails() {
    let err = compile("(a)|(b)").sub(r"[\2]", "a", 0).unwrap_err();
    assert!(matches!(err, Error::InvalidBackreference { .. }));
}

#[test]
fn template_errors_are_raised_even_without_matches() {
    let p = compile("z");
    assert!(matches!(
        p.sub(r"\q", "abc", 0),
        Err(Error::InvalidBackreference { .. })
    ));
    assert!(matches!(
        p.sub(r"\g<missing>", "abc", 0),
        Err(Error::InvalidBackreference { .. })
    ));
}

#[test]
fn callable_replacement() {
    let p = compile(r"\d+");
    let out = p
        .sub(
            |m: &Match<'_>| {
                let n: u32 = m.matched().as_str().unwrap_or("0").parse().unwrap_or(0);
                (n * 2).to_string()
            },
            "a1 b20",
            0,
        )
        .unwrap();
    assert_eq!(out, "a2 b40");
}

#[test]
fn callable_sees_groups() {
    let p = compile(r"(?P<k>\w)=(?P<v>\w)");
    let out = p
        .sub(
            |m: &Match<'_>| {
                let k = m.group("k").unwrap().and_then(|h| h.as_str()).unwrap_or("");
                let v = m.group("v").unwrap().and_then(|h| h.as_str()).unwrap_or("");
                format!("{v}={k}")
            },
            "a=1, b=2",
            0,
        )
        .unwrap();
    assert_eq!(out, "1=a, 2=b");
}

#[test]
fn count_limits_replacements() {
    let p = compile("a");
    assert_eq!(p.sub("b", "aaa", 2).unwrap(), "bba");
    let (out, n) = p.subn("b", "aaa", 0).unwrap();
    assert_eq!(out, "bbb");
    assert_eq!(n, 3);
    let (out, n) = p.subn("b", "xyz", 0).unwrap();
    assert_eq!(out, "xyz");
    assert_eq!(n, 0);
}

#[test]
fn zero_width_matches_copy_one_character_forward() {
    let out = compile("x*").sub("-", "abxd", 0).unwrap();
    assert_eq!(out, "-a-b--d-");
    let out = compile("").sub("|", "é", 0).unwrap();
    assert_eq!(out, "|é|");
}

#[test]
fn non_ascii_text_is_kept_intact() {
    assert_eq!(compile("é").sub("e", "café crème", 0).unwrap(), "cafe crème");
}

#[test]
fn bytes_substitution() {
    let p = compile_bytes(b"(b)");
    let out = p.sub(b"<\\1>", b"abc\xff", 0).unwrap();
    assert_eq!(out, b"a<b>c\xff");
}

#[test]
fn mixed_flavors_are_rejected() {
    let p = compile("a");
    assert!(matches!(p.sub(b"x", "abc", 0), Err(Error::TypeMismatch(_))));
    assert!(matches!(
        p.sub(|_: &Match<'_>| b"x".to_vec(), "abc", 0),
        Err(Error::TypeMismatch(_))
    ));
}

#[test]
fn expand_on_a_match() {
    let m = compile(r"(\w)(\d)").search("x a1").unwrap().unwrap();
    assert_eq!(m.expand(r"\2\1").unwrap(), "1a");
    assert!(matches!(m.expand(r"\3"), Err(Error::InvalidBackreference { .. })));
    assert!(matches!(m.expand(b"\\1"), Err(Error::TypeMismatch(_))));
}

#[cfg(feature = "engine-pcre2")]
#[test]
fn substitution_through_the_fallback_engine() {
    let p = compile(r"(\w)\1");
    assert_eq!(p.sub(r"<\1>", "aabcc", 0).unwrap(), "<a>b<c>");
}
