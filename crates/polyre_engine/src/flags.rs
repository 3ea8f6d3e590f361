// crates/polyre_engine/src/flags.rs
use std::fmt;

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Битовая маска флагов компиляции (значения совместимы с `re.*`).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Flags: u32 {
        const TEMPLATE = 1;
        const IGNORECASE = 2;
        const LOCALE = 4;
        const MULTILINE = 8;
        const DOTALL = 16;
        const UNICODE = 32;
        const VERBOSE = 64;
        const DEBUG = 128;
        const ASCII = 256;
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

impl Flags {
    /// Строка флаговых символов в порядке объявления таблицы [`FLAG_CHARS`].
    /// Используется как часть ключа кэша и для отображения.
    pub fn to_flag_string(self) -> String {
        FLAG_CHARS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(ch, _)| *ch)
            .collect()
    }

    /// Обратное преобразование: OR всех флагов, найденных в строке.
    pub fn from_flag_str(s: &str) -> Result<Self, FlagError> {
        let mut flags = Flags::empty();
        for ch in s.chars() {
            let (_, flag) = FLAG_CHARS
                .iter()
                .find(|(c, _)| *c == ch)
                .ok_or(FlagError::UnknownFlag(ch))?;
            flags.insert(*flag);
        }
        Ok(flags)
    }
}

/// Таблица флаговых символов. Порядок = порядок объявления, он же порядок в строке-ключе.
/// У DEBUG символа нет.
pub const FLAG_CHARS: [(char, Flags); 8] = [
    ('i', Flags::IGNORECASE),
    ('L', Flags::LOCALE),
    ('m', Flags::MULTILINE),
    ('s', Flags::DOTALL),
    ('x', Flags::VERBOSE),
    ('a', Flags::ASCII),
    ('t', Flags::TEMPLATE),
    ('u', Flags::UNICODE),
];

/// Внутренний маркер sticky-режима (якорь ровно в `pos`). В публичную маску не попадает.
pub const STICKY_FLAG: char = 'y';

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("0");
        }
        let mut items: Vec<String> = self
            .iter_names()
            .map(|(name, _)| format!("re.{name}"))
            .collect();
        // неизвестные биты — хвостом в hex
        let rest = self.bits() & !Flags::all().bits();
        if rest != 0 {
            items.push(format!("0x{rest:x}"));
        }
        f.write_str(&items.join("|"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("unknown flag character {0:?}")]
    UnknownFlag(char),
}

/// Конфигурация, под которой компилируется матчер: базовые флаги + sticky.
/// Детерминированно превращается в строку-ключ (`"im"`, `"imy"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatcherConfig {
    pub flags: Flags,
    pub sticky: bool,
}

impl MatcherConfig {
    pub fn new(flags: Flags) -> Self {
        Self {
            flags,
            sticky: false,
        }
    }

    pub fn with_sticky(self, sticky: bool) -> Self {
        Self { sticky, ..self }
    }

    pub fn flag_string(&self) -> String {
        let mut s = self.flags.to_flag_string();
        if self.sticky {
            s.push(STICKY_FLAG);
        }
        s
    }

    pub fn parse(s: &str) -> Result<Self, FlagError> {
        let sticky = s.contains(STICKY_FLAG);
        let base: String = s.chars().filter(|c| *c != STICKY_FLAG).collect();
        Ok(Self {
            flags: Flags::from_flag_str(&base)?,
            sticky,
        })
    }
}

impl fmt::Display for MatcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flag_string())
    }
}
