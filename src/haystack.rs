use std::fmt;
use std::ops::Range;

use polyre_engine::Flavor;

use crate::error::Error;

/// Вход любого вида, по ссылке.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Haystack<'h> {
    Text(&'h str),
    Bytes(&'h [u8]),
}

impl<'h> Haystack<'h> {
    pub fn flavor(&self) -> Flavor {
        match self {
            Haystack::Text(_) => Flavor::Text,
            Haystack::Bytes(_) => Flavor::Bytes,
        }
    }

    pub fn as_bytes(&self) -> &'h [u8] {
        match *self {
            Haystack::Text(s) => s.as_bytes(),
            Haystack::Bytes(b) => b,
        }
    }

    pub fn as_str(&self) -> Option<&'h str> {
        match *self {
            Haystack::Text(s) => Some(s),
            Haystack::Bytes(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Пустой вход заданного вида.
    pub fn empty(flavor: Flavor) -> Haystack<'static> {
        match flavor {
            Flavor::Text => Haystack::Text(""),
            Flavor::Bytes => Haystack::Bytes(b""),
        }
    }

    /// Подсрез. У текста смещения должны стоять на границах символов.
    pub fn slice(&self, range: Range<usize>) -> Haystack<'h> {
        match *self {
            Haystack::Text(s) => Haystack::Text(&s[range]),
            Haystack::Bytes(b) => Haystack::Bytes(&b[range]),
        }
    }

    /// Хвост от `start`, с обрезкой по концу.
    pub fn tail(&self, start: usize) -> Haystack<'h> {
        let start = start.min(self.len());
        self.slice(start..self.len())
    }

    /// Смещение на одну единицу после `pos`: байт, у текста — символ.
    pub fn next_unit(&self, pos: usize) -> usize {
        match *self {
            Haystack::Text(s) => s
                .get(pos..)
                .and_then(|rest| rest.chars().next())
                .map_or(pos + 1, |c| pos + c.len_utf8()),
            Haystack::Bytes(_) => pos + 1,
        }
    }

    /// Округляет `pos` вверх до границы символа (для байтов ничего не делает).
    pub(crate) fn ceil_boundary(&self, pos: usize) -> usize {
        match *self {
            Haystack::Text(s) => {
                let mut pos = pos;
                while pos < s.len() && !s.is_char_boundary(pos) {
                    pos += 1;
                }
                pos
            }
            Haystack::Bytes(_) => pos,
        }
    }

    /// Округляет `pos` вниз до границы символа (для байтов ничего не делает).
    pub(crate) fn floor_boundary(&self, pos: usize) -> usize {
        match *self {
            Haystack::Text(s) => {
                let mut pos = pos.min(s.len());
                while pos > 0 && !s.is_char_boundary(pos) {
                    pos -= 1;
                }
                pos
            }
            Haystack::Bytes(_) => pos,
        }
    }

    pub fn to_owned_buf(&self) -> HaystackBuf {
        match *self {
            Haystack::Text(s) => HaystackBuf::Text(s.to_string()),
            Haystack::Bytes(b) => HaystackBuf::Bytes(b.to_vec()),
        }
    }
}

impl<'h> From<&'h str> for Haystack<'h> {
    fn from(s: &'h str) -> Self {
        Haystack::Text(s)
    }
}

impl<'h> From<&'h String> for Haystack<'h> {
    fn from(s: &'h String) -> Self {
        Haystack::Text(s.as_str())
    }
}

impl<'h> From<&'h [u8]> for Haystack<'h> {
    fn from(b: &'h [u8]) -> Self {
        Haystack::Bytes(b)
    }
}

impl<'h> From<&'h Vec<u8>> for Haystack<'h> {
    fn from(b: &'h Vec<u8>) -> Self {
        Haystack::Bytes(b.as_slice())
    }
}

impl<'h, const N: usize> From<&'h [u8; N]> for Haystack<'h> {
    fn from(b: &'h [u8; N]) -> Self {
        Haystack::Bytes(b.as_slice())
    }
}

impl<'h> From<&'h HaystackBuf> for Haystack<'h> {
    fn from(buf: &'h HaystackBuf) -> Self {
        buf.as_haystack()
    }
}

impl PartialEq<str> for Haystack<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Haystack<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<[u8]> for Haystack<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        matches!(self, Haystack::Bytes(b) if *b == other)
    }
}

impl PartialEq<&[u8]> for Haystack<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        matches!(self, Haystack::Bytes(b) if b == other)
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for Haystack<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        matches!(self, Haystack::Bytes(b) if *b == other.as_slice())
    }
}

impl fmt::Display for Haystack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Haystack::Text(s) => write!(f, "{s:?}"),
            Haystack::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
        }
    }
}

/// Владеющий буфер любого вида (результат замены, копия исходника паттерна).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HaystackBuf {
    Text(String),
    Bytes(Vec<u8>),
}

impl HaystackBuf {
    pub fn new(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Text => HaystackBuf::Text(String::new()),
            Flavor::Bytes => HaystackBuf::Bytes(Vec::new()),
        }
    }

    pub fn flavor(&self) -> Flavor {
        self.as_haystack().flavor()
    }

    pub fn as_haystack(&self) -> Haystack<'_> {
        match self {
            HaystackBuf::Text(s) => Haystack::Text(s),
            HaystackBuf::Bytes(b) => Haystack::Bytes(b),
        }
    }

    pub fn len(&self) -> usize {
        self.as_haystack().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Дописывает `h`; вид должен совпадать.
    pub fn push(&mut self, h: Haystack<'_>) -> Result<(), Error> {
        match (self, h) {
            (HaystackBuf::Text(out), Haystack::Text(s)) => out.push_str(s),
            (HaystackBuf::Bytes(out), Haystack::Bytes(b)) => out.extend_from_slice(b),
            (out, h) => return Err(Error::flavor_mismatch(out.flavor(), h.flavor())),
        }
        Ok(())
    }

    pub(crate) fn push_ascii(&mut self, byte: u8) {
        debug_assert!(byte.is_ascii());
        match self {
            HaystackBuf::Text(out) => out.push(char::from(byte)),
            HaystackBuf::Bytes(out) => out.push(byte),
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            HaystackBuf::Text(s) => Some(s),
            HaystackBuf::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            HaystackBuf::Text(s) => s.into_bytes(),
            HaystackBuf::Bytes(b) => b,
        }
    }
}

impl From<String> for HaystackBuf {
    fn from(s: String) -> Self {
        HaystackBuf::Text(s)
    }
}

impl From<&str> for HaystackBuf {
    fn from(s: &str) -> Self {
        HaystackBuf::Text(s.to_string())
    }
}

impl From<Vec<u8>> for HaystackBuf {
    fn from(b: Vec<u8>) -> Self {
        HaystackBuf::Bytes(b)
    }
}

impl From<&[u8]> for HaystackBuf {
    fn from(b: &[u8]) -> Self {
        HaystackBuf::Bytes(b.to_vec())
    }
}

impl From<Haystack<'_>> for HaystackBuf {
    fn from(h: Haystack<'_>) -> Self {
        h.to_owned_buf()
    }
}

impl PartialEq<str> for HaystackBuf {
    fn eq(&self, other: &str) -> bool {
        self.as_haystack() == *other
    }
}

impl PartialEq<&str> for HaystackBuf {
    fn eq(&self, other: &&str) -> bool {
        self.as_haystack() == *other
    }
}

impl PartialEq<&[u8]> for HaystackBuf {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_haystack() == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for HaystackBuf {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_haystack() == *other
    }
}

impl fmt::Display for HaystackBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_haystack().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_unit_steps_whole_chars() {
        let h = Haystack::from("aé");
        assert_eq!(h.next_unit(0), 1);
        assert_eq!(h.next_unit(1), 3);
        assert_eq!(h.next_unit(3), 4);
        assert_eq!(Haystack::from(b"ab").next_unit(0), 1);
    }

    #[test]
    fn boundaries_round_in_the_right_direction() {
        let h = Haystack::from("aéb");
        assert_eq!(h.ceil_boundary(2), 3);
        assert_eq!(h.floor_boundary(2), 1);
        assert_eq!(h.floor_boundary(99), 4);
    }

    #[test]
    fn push_rejects_other_flavor() {
        let mut out = HaystackBuf::new(Flavor::Text);
        out.push(Haystack::from("ab")).unwrap();
        assert!(out.push(Haystack::from(b"cd")).is_err());
        assert_eq!(out, "ab");
    }

    #[test]
    fn display_like_a_literal() {
        assert_eq!(Haystack::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Haystack::from(b"a\xff").to_string(), "b\"a\\xff\"");
    }
}
