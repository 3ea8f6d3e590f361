pub mod config;
pub mod engine;
pub mod error;
pub mod flags;
pub mod outcome;
pub mod source;

pub use config::{EngineConfig, EngineKind};
pub use engine::{AutomataEngine, Engine, EngineFactory, EnvEngineFactory, FallbackEngine, Matcher};
#[cfg(feature = "engine-pcre2")]
pub use engine::Pcre2Engine;
pub use error::CompileFailure;
pub use flags::{FLAG_CHARS, FlagError, Flags, MatcherConfig, STICKY_FLAG};
pub use outcome::{Flavor, GroupNames, MatchOutcome};
