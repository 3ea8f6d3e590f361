use std::sync::Arc;

use dashmap::DashMap;
use polyre_engine::{CompileFailure, Engine, Matcher, MatcherConfig};

use crate::error::{Error, Result};

const POSITION_MARKER: &str = " at position ";

/// Кэш скомпилированных матчеров одного паттерна, ключ — (текст для движка, конфигурация).
///
/// Параллельные промахи по одному ключу могут оба скомпилировать; в карте остаётся первый.
#[derive(Default)]
pub(crate) struct MatcherCache {
    entries: DashMap<(String, MatcherConfig), Arc<dyn Matcher>>,
}

impl MatcherCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_or_compile(
        &self,
        engine: &dyn Engine,
        source: &str,
        config: MatcherConfig,
    ) -> Result<Arc<dyn Matcher>> {
        let key = (source.to_string(), config);
        if let Some(hit) = self.entries.get(&key) {
            return Ok(Arc::clone(hit.value()));
        }

        tracing::debug!(
            pattern = source,
            flags = %config,
            engine = engine.name(),
            "matcher cache miss"
        );
        let matcher = engine
            .compile(source, config)
            .map_err(|failure| compile_error(failure, source))?;

        let stored = self.entries.entry(key).or_insert(matcher);
        Ok(Arc::clone(stored.value()))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

fn compile_error(failure: CompileFailure, pattern: &str) -> Error {
    match failure {
        CompileFailure::Syntax { message } => {
            let (message, position) = split_position(&message);
            Error::Compile {
                message,
                pattern: pattern.to_string(),
                position,
            }
        }
        // сюда попадаем только без фолбэка
        CompileFailure::Unsupported { construct } => Error::Compile {
            message: format!("unsupported construct: {construct}"),
            pattern: pattern.to_string(),
            position: None,
        },
        CompileFailure::Engine(e) => Error::Engine(e),
    }
}

/// Делит `"<message> at position <N>"` на сообщение и позицию.
fn split_position(message: &str) -> (String, Option<usize>) {
    if let Some(boundary) = message.rfind(POSITION_MARKER) {
        let tail = &message[boundary + POSITION_MARKER.len()..];
        if let Ok(position) = tail.trim().parse::<usize>() {
            return (message[..boundary].to_string(), Some(position));
        }
    }
    (message.to_string(), None)
}
