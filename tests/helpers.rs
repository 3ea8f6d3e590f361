// path: tests/helpers.rs
#![allow(dead_code)]

use polyre::{EngineConfig, EnvEngineFactory, Flags, Pattern, Sre};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Движки с конфигурацией по умолчанию, без чтения ENV (тесты конфигурации его трогают).
pub fn sre() -> Sre {
    init_tracing();
    Sre::new(&EnvEngineFactory::from_config(EngineConfig::default()))
}

pub fn compile(pattern: &str) -> Pattern {
    sre().compile(pattern, Flags::empty()).expect("pattern compiles")
}

pub fn compile_with(pattern: &str, flags: Flags) -> Pattern {
    sre().compile(pattern, flags).expect("pattern compiles")
}

pub fn compile_bytes(pattern: &[u8]) -> Pattern {
    sre().compile(pattern, Flags::empty()).expect("pattern compiles")
}
