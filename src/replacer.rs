use crate::error::Result;
use crate::haystack::{Haystack, HaystackBuf};
use crate::matched::Match;

/// Источник замены для [`Pattern::sub`](crate::Pattern::sub).
///
/// Литерал (строка или байты) разбирается как шаблон с обратными ссылками один раз
/// на весь вызов; функция вызывается на каждое совпадение.
pub trait Replacer {
    /// Текст шаблона, если замена литеральная.
    fn template(&self) -> Option<Haystack<'_>> {
        None
    }

    /// Замена для одного совпадения.
    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf>;
}

impl Replacer for &str {
    fn template(&self) -> Option<Haystack<'_>> {
        Some(Haystack::Text(self))
    }

    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf> {
        m.expand(*self)
    }
}

impl Replacer for String {
    fn template(&self) -> Option<Haystack<'_>> {
        Some(Haystack::Text(self))
    }

    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf> {
        m.expand(self.as_str())
    }
}

impl Replacer for &[u8] {
    fn template(&self) -> Option<Haystack<'_>> {
        Some(Haystack::Bytes(self))
    }

    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf> {
        m.expand(*self)
    }
}

impl<const N: usize> Replacer for &[u8; N] {
    fn template(&self) -> Option<Haystack<'_>> {
        Some(Haystack::Bytes(self.as_slice()))
    }

    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf> {
        m.expand(*self)
    }
}

impl Replacer for Vec<u8> {
    fn template(&self) -> Option<Haystack<'_>> {
        Some(Haystack::Bytes(self))
    }

    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf> {
        m.expand(self.as_slice())
    }
}

impl Replacer for Haystack<'_> {
    fn template(&self) -> Option<Haystack<'_>> {
        Some(*self)
    }

    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf> {
        m.expand(*self)
    }
}

impl<F, T> Replacer for F
where
    F: FnMut(&Match<'_>) -> T,
    T: Into<HaystackBuf>,
{
    fn replace(&mut self, m: &Match<'_>) -> Result<HaystackBuf> {
        Ok((*self)(m).into())
    }
}
