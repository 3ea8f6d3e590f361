// path: crates/polyre_engine/src/config.rs
use serde::Deserialize;

/// Какой движок основной.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Automata,
    Pcre2,
}

impl EngineKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "automata" | "regex" => Some(EngineKind::Automata),
            "pcre2" => Some(EngineKind::Pcre2),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_primary")]
    pub primary: EngineKind,
    /// Отдавать непредставимые для основного движка паттерны backtracking-движку.
    #[serde(default = "default_fallback")]
    pub fallback: bool,
    /// Лимит размера скомпилированной программы основного движка (байты).
    #[serde(default)]
    pub size_limit: Option<usize>,
    #[serde(default = "default_jit")]
    pub jit: bool,
}

fn default_primary() -> EngineKind { EngineKind::Automata }
fn default_fallback() -> bool { true }
fn default_jit() -> bool { true }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            fallback: default_fallback(),
            size_limit: None,
            jit: default_jit(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let primary = std::env::var("POLYRE_ENGINE").ok().and_then(|s| EngineKind::parse(&s)).unwrap_or(default_primary());
        let fallback = std::env::var("POLYRE_FALLBACK").ok().and_then(|s| parse_bool(&s)).unwrap_or(default_fallback());
        let size_limit = std::env::var("POLYRE_SIZE_LIMIT").ok().and_then(|s| s.parse().ok());
        let jit = std::env::var("POLYRE_JIT").ok().and_then(|s| parse_bool(&s)).unwrap_or(default_jit());

        Self { primary, fallback, size_limit, jit }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
