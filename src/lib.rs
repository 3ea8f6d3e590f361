//! polyre: `re`-style API (compile / search / match / fullmatch / findall / sub / split)
//! over a pluggable matching engine.
//!
//! Семантика (нумерация групп, якорение, продвижение после пустых совпадений,
//! обратные ссылки в заменах, split) живёт здесь; посимвольный поиск — в
//! [`polyre_engine`].
use std::sync::Arc;

mod cache;
pub mod error;
pub mod haystack;
pub mod matched;
pub mod pattern;
pub mod replacer;
mod template;

pub use error::{Error, Result};
pub use haystack::{Haystack, HaystackBuf};
pub use matched::{GroupRef, Match};
pub use pattern::{FindIter, Found, Pattern};
pub use replacer::Replacer;

pub use polyre_engine::{
    Engine, EngineConfig, EngineFactory, EngineKind, EnvEngineFactory, Flags, Flavor, GroupNames,
};

/// Точка входа: держит по одному движку на каждый [`Flavor`].
///
/// Движки строятся один раз в конструкторе и передаются явно; глобального состояния нет.
#[derive(Clone)]
pub struct Sre {
    text: Arc<dyn Engine>,
    bytes: Arc<dyn Engine>,
}

impl Sre {
    pub fn new(factory: &dyn EngineFactory) -> Self {
        Self {
            text: factory.build(Flavor::Text),
            bytes: factory.build(Flavor::Bytes),
        }
    }

    /// Движки по `POLYRE_*` из окружения.
    pub fn from_env() -> Self {
        Self::new(&EnvEngineFactory::from_env())
    }

    /// Готовые движки (например, заглушки в тестах).
    pub fn with_engines(text: Arc<dyn Engine>, bytes: Arc<dyn Engine>) -> Self {
        debug_assert_eq!(text.flavor(), Flavor::Text);
        debug_assert_eq!(bytes.flavor(), Flavor::Bytes);
        Self { text, bytes }
    }

    pub fn engine(&self, flavor: Flavor) -> &Arc<dyn Engine> {
        match flavor {
            Flavor::Text => &self.text,
            Flavor::Bytes => &self.bytes,
        }
    }

    /// Компиляция; вид паттерна (текст/байты) выбирает движок.
    pub fn compile<'p>(&self, pattern: impl Into<Haystack<'p>>, flags: Flags) -> Result<Pattern> {
        let pattern = pattern.into();
        Pattern::new(Arc::clone(self.engine(pattern.flavor())), pattern, flags)
    }
}

impl Default for Sre {
    fn default() -> Self {
        Self::from_env()
    }
}

impl std::fmt::Debug for Sre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sre")
            .field("text", &self.text.name())
            .field("bytes", &self.bytes.name())
            .finish()
    }
}

/// Экранирует метасимволы так, чтобы паттерн совпадал с `input` буквально.
pub fn escape<'h>(input: impl Into<Haystack<'h>>) -> HaystackBuf {
    match input.into() {
        Haystack::Text(s) => HaystackBuf::Text(regex::escape(s)),
        Haystack::Bytes(b) => {
            let mut out = Vec::with_capacity(b.len());
            for &byte in b {
                if byte.is_ascii() && regex_syntax::is_meta_character(char::from(byte)) {
                    out.push(b'\\');
                }
                out.push(byte);
            }
            HaystackBuf::Bytes(out)
        }
    }
}
