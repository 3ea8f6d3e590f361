use std::sync::Arc;

use super::{AutomataEngine, Engine, FallbackEngine};
use crate::config::{EngineConfig, EngineKind};
use crate::Flavor;

/// Фабрика движков: один движок на каждый [`Flavor`], строится один раз при старте.
pub trait EngineFactory: Send + Sync {
    fn build(&self, flavor: Flavor) -> Arc<dyn Engine>;
}

/// Выбор движков по конфигурации (по умолчанию — из ENV), с безопасным фолбэком на automata.
pub struct EnvEngineFactory {
    config: EngineConfig,
}

impl EnvEngineFactory {
    pub fn from_env() -> Self {
        Self::from_config(EngineConfig::from_env())
    }

    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn primary(&self, flavor: Flavor) -> Arc<dyn Engine> {
        match self.config.primary {
            EngineKind::Pcre2 => match self.pcre2(flavor) {
                Some(engine) => engine,
                None => {
                    tracing::warn!("pcre2 engine requested but not compiled in; using automata");
                    self.automata(flavor)
                }
            },
            EngineKind::Automata => self.automata(flavor),
        }
    }

    fn automata(&self, flavor: Flavor) -> Arc<dyn Engine> {
        Arc::new(AutomataEngine::new(flavor).with_size_limit(self.config.size_limit))
    }

    #[cfg(feature = "engine-pcre2")]
    fn pcre2(&self, flavor: Flavor) -> Option<Arc<dyn Engine>> {
        Some(Arc::new(
            super::Pcre2Engine::new(flavor).with_jit(self.config.jit),
        ))
    }

    #[cfg(not(feature = "engine-pcre2"))]
    fn pcre2(&self, _flavor: Flavor) -> Option<Arc<dyn Engine>> {
        None
    }
}

impl Default for EnvEngineFactory {
    fn default() -> Self {
        Self::from_env()
    }
}

impl EngineFactory for EnvEngineFactory {
    fn build(&self, flavor: Flavor) -> Arc<dyn Engine> {
        let primary = self.primary(flavor);
        // Backtracking-движок за самим собой не нужен.
        let fallback = if self.config.fallback && primary.name() != "pcre2" {
            let fb = self.pcre2(flavor);
            if fb.is_none() {
                tracing::warn!(?flavor, "fallback requested but no backtracking engine is compiled in");
            }
            fb
        } else {
            None
        };
        tracing::info!(
            ?flavor,
            primary = primary.name(),
            fallback = fallback.as_ref().map(|f| f.name()).unwrap_or("none"),
            "engine selected"
        );
        Arc::new(FallbackEngine::new(primary, fallback))
    }
}
