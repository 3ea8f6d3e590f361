use polyre_engine::{
    AutomataEngine, CompileFailure, Engine, FallbackEngine, Flavor, Matcher, MatcherConfig,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Фолбэк, который только считает вызовы.
struct CountingEngine {
    calls: AtomicUsize,
}

impl Engine for CountingEngine {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn flavor(&self) -> Flavor {
        Flavor::Text
    }

    fn compile(
        &self,
        pattern: &str,
        config: MatcherConfig,
    ) -> Result<Arc<dyn Matcher>, CompileFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // отдаём работу основному движку на упрощённом паттерне
        AutomataEngine::new(Flavor::Text).compile(&pattern.replace(r"\1", "a"), config)
    }
}

fn router() -> (FallbackEngine, Arc<CountingEngine>) {
    let counting = Arc::new(CountingEngine {
        calls: AtomicUsize::new(0),
    });
    let engine = FallbackEngine::new(
        Arc::new(AutomataEngine::new(Flavor::Text)),
        Some(counting.clone() as Arc<dyn Engine>),
    );
    (engine, counting)
}

#[test]
fn unsupported_goes_to_fallback() {
    let (engine, counting) = router();
    let m = engine.compile(r"(a)\1", MatcherConfig::default()).unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    assert!(m.search_at(b"aa", 0).unwrap().is_some());
}

#[test]
fn supported_stays_on_primary() {
    let (engine, counting) = router();
    engine.compile("abc", MatcherConfig::default()).unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn syntax_error_never_falls_back() {
    let (engine, counting) = router();
    let err = engine.compile("(", MatcherConfig::default()).err().unwrap();
    assert!(matches!(err, CompileFailure::Syntax { .. }));
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn without_fallback_unsupported_is_returned() {
    let engine = FallbackEngine::new(Arc::new(AutomataEngine::new(Flavor::Text)), None);
    let err = engine.compile(r"(a)\1", MatcherConfig::default()).err().unwrap();
    assert!(err.is_unsupported());
}

#[cfg(feature = "engine-pcre2")]
#[test]
fn pcre2_fallback_supplies_its_own_names() {
    use polyre_engine::Pcre2Engine;
    let engine = FallbackEngine::new(
        Arc::new(AutomataEngine::new(Flavor::Text)),
        Some(Arc::new(Pcre2Engine::new(Flavor::Text))),
    );
    let m = engine
        .compile(r"(?P<ch>\w)\1", MatcherConfig::default())
        .unwrap();
    assert_eq!(m.group_names().get("ch"), Some(1));
    assert_eq!(m.search_at(b"abbc", 0).unwrap().unwrap().bounds(), (1, 3));
}
