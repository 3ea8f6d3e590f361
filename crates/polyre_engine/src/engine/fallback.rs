// crates/polyre_engine/src/engine/fallback.rs
use std::sync::Arc;

use super::{Engine, Matcher};
use crate::{CompileFailure, Flavor, MatcherConfig};

/// Основной движок + опциональный фолбэк с той же сигнатурой.
///
/// В фолбэк уходят только [`CompileFailure::Unsupported`]; синтаксические ошибки
/// возвращаются как есть.
pub struct FallbackEngine {
    primary: Arc<dyn Engine>,
    fallback: Option<Arc<dyn Engine>>,
}

impl FallbackEngine {
    pub fn new(primary: Arc<dyn Engine>, fallback: Option<Arc<dyn Engine>>) -> Self {
        debug_assert!(
            fallback
                .as_ref()
                .is_none_or(|f| f.flavor() == primary.flavor()),
            "fallback engine must share the primary flavor"
        );
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &Arc<dyn Engine> {
        &self.primary
    }

    pub fn fallback(&self) -> Option<&Arc<dyn Engine>> {
        self.fallback.as_ref()
    }
}

impl Engine for FallbackEngine {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn flavor(&self) -> Flavor {
        self.primary.flavor()
    }

    fn compile(
        &self,
        pattern: &str,
        config: MatcherConfig,
    ) -> Result<Arc<dyn Matcher>, CompileFailure> {
        match self.primary.compile(pattern, config) {
            Err(CompileFailure::Unsupported { construct }) => match &self.fallback {
                Some(fallback) => {
                    tracing::debug!(
                        pattern,
                        %construct,
                        primary = self.primary.name(),
                        fallback = fallback.name(),
                        "primary engine refused pattern; compiling with fallback"
                    );
                    fallback.compile(pattern, config)
                }
                None => Err(CompileFailure::Unsupported { construct }),
            },
            other => other,
        }
    }
}
