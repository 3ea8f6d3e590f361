// src/template.rs
//
// Грамматика обратных ссылок в строке замены:
//   \<digit>        -> группа с этим номером
//   \g<name|digits> -> группа по имени или номеру
//   \\              -> обратный слэш
//   \n \t \r \f \v \a -> соответствующий управляющий символ
// Всё остальное после `\` — ошибка, молча не пропускаем.
use std::ops::Range;

use polyre_engine::GroupNames;

use crate::error::{Error, Result};
use crate::haystack::{Haystack, HaystackBuf};
use crate::matched::Match;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(Range<usize>),
    Char(u8),
    /// `at` — позиция `\` в шаблоне, для сообщения об ошибке.
    Group { index: usize, at: usize },
}

/// Разобранный шаблон замены. Разбирается один раз на весь `sub`.
#[derive(Debug, Clone)]
pub(crate) struct Template<'t> {
    source: Haystack<'t>,
    pieces: Vec<Piece>,
}

impl<'t> Template<'t> {
    /// `group_count` включает группу 0. Номера групп проверяются здесь,
    /// участие группы в совпадении — при подстановке.
    pub(crate) fn parse(
        source: Haystack<'t>,
        names: &GroupNames,
        group_count: Option<usize>,
    ) -> Result<Self> {
        let bytes = source.as_bytes();
        let mut pieces = Vec::new();
        let mut copied = 0;
        let mut at = 0;

        while let Some(offset) = bytes[at..].iter().position(|&b| b == b'\\') {
            let slash = at + offset;
            if slash > copied {
                pieces.push(Piece::Literal(copied..slash));
            }
            let Some(&next) = bytes.get(slash + 1) else {
                return Err(Error::bad_template(format!(
                    "bad escape (end of pattern) at position {slash}"
                )));
            };

            let consumed = match next {
                b'0'..=b'9' => {
                    let index = usize::from(next - b'0');
                    check_index(index, group_count, slash)?;
                    pieces.push(Piece::Group { index, at: slash });
                    2
                }
                b'g' => {
                    let (index, len) = group_name(bytes, slash, names)?;
                    check_index(index, group_count, slash)?;
                    pieces.push(Piece::Group { index, at: slash });
                    len
                }
                b'\\' => {
                    pieces.push(Piece::Char(b'\\'));
                    2
                }
                other => match control_char(other) {
                    Some(c) => {
                        pieces.push(Piece::Char(c));
                        2
                    }
                    None => {
                        return Err(Error::bad_template(format!(
                            "bad escape {} at position {slash}",
                            escape_text(source, slash)
                        )))
                    }
                },
            };
            at = slash + consumed;
            copied = at;
        }
        if copied < bytes.len() {
            pieces.push(Piece::Literal(copied..bytes.len()));
        }

        Ok(Self { source, pieces })
    }

    pub(crate) fn expand(&self, m: &Match<'_>, out: &mut HaystackBuf) -> Result<()> {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(range) => out.push(self.source.slice(range.clone()))?,
                Piece::Char(c) => out.push_ascii(*c),
                Piece::Group { index, at } => {
                    if *index >= m.len() {
                        return Err(invalid_reference(*index, *at));
                    }
                    let text = m
                        .group_at(*index)
                        .ok_or_else(|| invalid_reference(*index, *at))?;
                    out.push(text)?;
                }
            }
        }
        Ok(())
    }
}

fn control_char(c: u8) -> Option<u8> {
    Some(match c {
        b'n' => b'\n',
        b't' => b'\t',
        b'r' => b'\r',
        b'f' => 0x0c,
        b'v' => 0x0b,
        b'a' => 0x07,
        _ => return None,
    })
}

fn check_index(index: usize, group_count: Option<usize>, at: usize) -> Result<()> {
    match group_count {
        Some(count) if index >= count => Err(invalid_reference(index, at)),
        _ => Ok(()),
    }
}

fn invalid_reference(index: usize, at: usize) -> Error {
    Error::bad_template(format!("invalid group reference {index} at position {at}"))
}

/// Разбор `\g<...>`, начиная с `\` в позиции `slash`.
/// Возвращает (номер группы, длину всей конструкции).
fn group_name(bytes: &[u8], slash: usize, names: &GroupNames) -> Result<(usize, usize)> {
    let open = slash + 2;
    if bytes.get(open) != Some(&b'<') {
        return Err(Error::bad_template(format!("missing < at position {slash}")));
    }
    let Some(close) = bytes[open + 1..].iter().position(|&b| b == b'>') else {
        return Err(Error::bad_template(format!(
            "missing >, unterminated name at position {slash}"
        )));
    };
    let raw = &bytes[open + 1..open + 1 + close];
    if raw.is_empty() {
        return Err(Error::bad_template(format!(
            "missing group name at position {slash}"
        )));
    }
    let name = std::str::from_utf8(raw).map_err(|_| {
        Error::bad_template(format!("bad character in group name at position {slash}"))
    })?;

    let index = if name.bytes().all(|b| b.is_ascii_digit()) {
        name.parse::<usize>()
            .map_err(|_| Error::bad_template(format!("invalid group reference {name} at position {slash}")))?
    } else {
        names
            .get(name)
            .ok_or_else(|| Error::bad_template(format!("unknown group name '{name}'")))?
    };
    // `\g<` + name + `>`
    Ok((index, close + 4))
}

/// Текст неизвестного escape для сообщения: `\` плюс следующий символ целиком.
fn escape_text(source: Haystack<'_>, slash: usize) -> String {
    match source {
        Haystack::Text(s) => s[slash..].chars().take(2).collect(),
        Haystack::Bytes(b) => b[slash..slash + 2].escape_ascii().to_string(),
    }
}
