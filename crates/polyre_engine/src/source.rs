// crates/polyre_engine/src/source.rs
//! Переписывание текста паттерна по дороге в движок.
use std::borrow::Cow;
use std::fmt::Write;

/// Байтовые паттерны уходят в движки как `&str`: байты вне UTF-8 записываются
/// как `\xHH`, оба движка без Unicode-режима читают это как один сырой байт.
pub fn bytes_to_engine_source(pattern: &[u8]) -> Cow<'_, str> {
    if let Ok(s) = std::str::from_utf8(pattern) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(pattern.len() + 8);
    for chunk in pattern.utf8_chunks() {
        out.push_str(chunk.valid());
        for b in chunk.invalid() {
            let _ = write!(out, "\\x{b:02X}");
        }
    }
    Cow::Owned(out)
}

/// `(?:src)`. В verbose-режиме хвостовой `#`-комментарий съел бы скобку,
/// поэтому перед ней перевод строки.
pub fn wrap_group(src: &str, verbose: bool) -> String {
    let mut out = String::with_capacity(src.len() + 6);
    out.push_str("(?:");
    out.push_str(src);
    if verbose {
        out.push('\n');
    }
    out.push(')');
    out
}

/// Якорь в точке старта поиска для движков с `\G`.
pub fn anchor_at_search_start(src: &str, verbose: bool) -> String {
    format!("\\G{}", wrap_group(src, verbose))
}

/// Дописывает явный конец входа (`\z`).
///
/// Паттерн сначала оборачивается, чтобы альтернатива верхнего уровня якорилась целиком.
/// Если паттерн уже кончается на `\z` и `|` верхнего уровня нет — не трогаем
/// (повторное применение ничего не меняет).
pub fn append_end_assertion(src: &str, verbose: bool) -> Cow<'_, str> {
    if ends_with_end_assertion(src) && !has_top_level_alternation(src) {
        return Cow::Borrowed(src);
    }
    let mut out = wrap_group(src, verbose);
    out.push_str("\\z");
    Cow::Owned(out)
}

fn ends_with_end_assertion(src: &str) -> bool {
    let Some(head) = src.strip_suffix('z') else {
        return false;
    };
    let slashes = head.bytes().rev().take_while(|b| *b == b'\\').count();
    slashes % 2 == 1
}

fn has_top_level_alternation(src: &str) -> bool {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => i = skip_class(bytes, i),
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => return true,
            _ => {}
        }
        i += 1;
    }
    false
}

/// Порядок закрытия групп: `order[i]` — номер закрывающей скобки группы `i`
/// среди всех захватывающих групп паттерна. Группа 0 закрывается последней.
pub fn group_close_order(src: &str, verbose: bool) -> Vec<usize> {
    let bytes = src.as_bytes();
    let mut order = vec![usize::MAX];
    let mut open: Vec<Option<usize>> = Vec::new();
    let mut closed = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' => i = skip_class(bytes, i),
            b'#' if verbose => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'(' => {
                let rest = &bytes[i + 1..];
                if rest.starts_with(b"?#") {
                    // (?#комментарий)
                    while i < bytes.len() && bytes[i] != b')' {
                        i += 1;
                    }
                } else if is_capturing(rest) {
                    order.push(0);
                    open.push(Some(order.len() - 1));
                } else {
                    open.push(None);
                }
            }
            b')' => {
                if let Some(Some(group)) = open.pop() {
                    order[group] = closed;
                    closed += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    order
}

fn is_capturing(after_paren: &[u8]) -> bool {
    if !after_paren.starts_with(b"?") {
        return true;
    }
    after_paren.starts_with(b"?P<")
        || (after_paren.starts_with(b"?<")
            && !after_paren.starts_with(b"?<=")
            && !after_paren.starts_with(b"?<!"))
}

/// Индекс `]`, закрывающей класс, открытый в `open`.
fn skip_class(bytes: &[u8], open: usize) -> usize {
    let mut i = open + 1;
    if bytes.get(i) == Some(&b'^') {
        i += 1;
    }
    // `]` right after the opening bracket is a literal
    if bytes.get(i) == Some(&b']') {
        i += 1;
    }
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b']' => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}
