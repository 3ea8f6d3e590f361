// crates/polyre_engine/src/engine/mod.rs
use anyhow::Result;
use std::sync::Arc;

mod automata_impl;
mod fallback;
#[cfg(feature = "engine-pcre2")]
mod pcre2_impl;

pub mod factory;
pub use factory::{EngineFactory, EnvEngineFactory};

pub use automata_impl::AutomataEngine;
pub use fallback::FallbackEngine;
#[cfg(feature = "engine-pcre2")]
pub use pcre2_impl::Pcre2Engine;

use crate::{CompileFailure, Flavor, GroupNames, MatchOutcome, MatcherConfig};

/// Движок сопоставления: компилирует текст паттерна под конфигурацию флагов.
/// Строится один раз на каждый [`Flavor`] и дальше только читается.
pub trait Engine: Send + Sync {
    /// Короткое имя для логов.
    fn name(&self) -> &'static str;

    fn flavor(&self) -> Flavor;

    /// Компиляция. Синтаксическая ошибка -> [`CompileFailure::Syntax`],
    /// непредставимая конструкция -> [`CompileFailure::Unsupported`].
    fn compile(
        &self,
        pattern: &str,
        config: MatcherConfig,
    ) -> std::result::Result<Arc<dyn Matcher>, CompileFailure>;
}

/// Скомпилированный матчер. Безопасен для параллельного read-only исполнения.
///
/// Все смещения байтовые; `from` может быть равен `haystack.len()`.
pub trait Matcher: Send + Sync {
    /// Свободный поиск, начиная с `from`.
    fn search_at(&self, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>>;

    /// Совпадение, начинающееся ровно в `from`.
    fn match_at(&self, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>>;

    /// Конфигурация, под которой матчер скомпилирован.
    fn config(&self) -> MatcherConfig;

    /// Таблица имён групп от того движка, который компилировал паттерн.
    fn group_names(&self) -> &Arc<GroupNames>;

    /// Число групп, включая группу 0.
    fn captures_len(&self) -> usize;

    /// Исполнение по конфигурации: sticky -> [`Matcher::match_at`], иначе [`Matcher::search_at`].
    fn execute(&self, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>> {
        if self.config().sticky {
            self.match_at(haystack, from)
        } else {
            self.search_at(haystack, from)
        }
    }
}
