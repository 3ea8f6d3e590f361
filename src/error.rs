use polyre_engine::Flavor;
use thiserror::Error;

/// Ошибки, которые видит вызывающий код.
#[derive(Debug, Error)]
pub enum Error {
    /// Вид входа (текст/байты) не совпадает с видом паттерна.
    #[error("{0}")]
    TypeMismatch(&'static str),

    /// Некорректный паттерн. `position` — символьное смещение в `pattern` (с нуля).
    #[error("{message}{}", position_suffix(.position))]
    Compile {
        message: String,
        pattern: String,
        position: Option<usize>,
    },

    /// Шаблон замены ссылается на несуществующую или неучаствовавшую группу либо содержит плохой escape.
    #[error("{message}")]
    InvalidBackreference { message: String },

    /// Нет такой группы (неверный номер или неизвестное имя).
    #[error("no such group: {group}")]
    NoSuchGroup { group: String },

    /// Сбой движка, пробрасывается как есть.
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

fn position_suffix(position: &Option<usize>) -> String {
    position
        .map(|p| format!(" at position {p}"))
        .unwrap_or_default()
}

impl Error {
    pub(crate) fn flavor_mismatch(pattern: Flavor, input: Flavor) -> Error {
        debug_assert_ne!(pattern, input);
        match pattern {
            Flavor::Text => Error::TypeMismatch("cannot use a string pattern on a bytes-like object"),
            Flavor::Bytes => Error::TypeMismatch("cannot use a bytes pattern on a string-like object"),
        }
    }

    pub(crate) fn bad_template(message: impl Into<String>) -> Error {
        Error::InvalidBackreference {
            message: message.into(),
        }
    }

    /// Позиция ошибки для [`Error::Compile`], если есть.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Compile { position, .. } => *position,
            _ => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
