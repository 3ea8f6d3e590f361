// crates/polyre_engine/src/error.rs
use thiserror::Error;

/// Ошибка компиляции на стороне движка.
#[derive(Debug, Error)]
pub enum CompileFailure {
    /// Синтаксическая ошибка. Сообщение может заканчиваться на `" at position <N>"`.
    #[error("{message}")]
    Syntax { message: String },

    /// Движок не умеет представить конструкцию. Внутренний сигнал для выбора
    /// фолбэк-движка, наружу не отдаётся.
    #[error("unsupported construct: {construct}")]
    Unsupported { construct: String },

    /// Прочие отказы движка, как есть.
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

impl CompileFailure {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CompileFailure::Unsupported { .. })
    }
}
