// crates/polyre_engine/src/engine/pcre2_impl.rs
use anyhow::Result;
use once_cell::sync::OnceCell;
use pcre2::bytes::{Regex, RegexBuilder};
use std::sync::Arc;

use super::{Engine, Matcher};
use crate::source::anchor_at_search_start;
use crate::{CompileFailure, Flags, Flavor, GroupNames, MatchOutcome, MatcherConfig};

/// PCRE2-движок (классический backtracking). Используется как фолбэк для
/// конструкций, которые не умеет основной движок: обратные ссылки, look-around.
///
/// Для текста включаем UTF (+UCP, если не ASCII): смещения всё равно байтовые.
pub struct Pcre2Engine {
    flavor: Flavor,
    jit: bool,
}

impl Pcre2Engine {
    pub fn new(flavor: Flavor) -> Self {
        Self { flavor, jit: true }
    }

    pub fn with_jit(mut self, jit: bool) -> Self {
        self.jit = jit;
        self
    }
}

#[derive(Clone, Copy)]
struct Settings {
    flavor: Flavor,
    jit: bool,
    flags: Flags,
}

impl Settings {
    fn build(&self, pattern: &str) -> std::result::Result<Regex, pcre2::Error> {
        let text = self.flavor.is_text();
        RegexBuilder::new()
            .caseless(self.flags.contains(Flags::IGNORECASE))
            .multi_line(self.flags.contains(Flags::MULTILINE))
            .dotall(self.flags.contains(Flags::DOTALL))
            .extended(self.flags.contains(Flags::VERBOSE))
            .utf(text)
            .ucp(text && !self.flags.contains(Flags::ASCII))
            .jit_if_available(self.jit)
            .build(pattern)
    }
}

impl Engine for Pcre2Engine {
    fn name(&self) -> &'static str {
        "pcre2"
    }

    fn flavor(&self) -> Flavor {
        self.flavor
    }

    fn compile(
        &self,
        pattern: &str,
        config: MatcherConfig,
    ) -> std::result::Result<Arc<dyn Matcher>, CompileFailure> {
        let settings = Settings {
            flavor: self.flavor,
            jit: self.jit,
            flags: config.flags,
        };
        let verbose = config.flags.contains(Flags::VERBOSE);

        // Компилируем сразу тот вариант, который требует конфигурация:
        // синтаксические ошибки должны всплыть на компиляции, а не на первом поиске.
        let unanchored = OnceCell::new();
        let anchored = OnceCell::new();
        let primary = if config.sticky {
            let src = anchor_at_search_start(pattern, verbose);
            let re = settings
                .build(&src)
                .map_err(|e| syntax_failure(&e, pattern, ANCHOR_PREFIX_LEN))?;
            anchored.get_or_init(|| re)
        } else {
            let re = settings
                .build(pattern)
                .map_err(|e| syntax_failure(&e, pattern, 0))?;
            unanchored.get_or_init(|| re)
        };

        let names = GroupNames::from_indexed(primary.capture_names().iter().map(|n| n.as_deref()));
        let captures_len = primary.captures_len();

        Ok(Arc::new(Pcre2Matcher {
            source: pattern.to_string(),
            settings,
            unanchored,
            anchored,
            names: Arc::new(names),
            config,
            captures_len,
        }))
    }
}

/// Длина префикса `\G(?:`.
const ANCHOR_PREFIX_LEN: usize = 5;

fn syntax_failure(err: &pcre2::Error, pattern: &str, prefix: usize) -> CompileFailure {
    let message = match err.offset() {
        Some(offset) => {
            let offset = offset.saturating_sub(prefix).min(pattern.len());
            let position = pattern
                .get(..offset)
                .map_or(offset, |head| head.chars().count());
            format!("{err} at position {position}")
        }
        None => err.to_string(),
    };
    CompileFailure::Syntax { message }
}

struct Pcre2Matcher {
    source: String,
    settings: Settings,
    unanchored: OnceCell<Regex>,
    anchored: OnceCell<Regex>,
    names: Arc<GroupNames>,
    config: MatcherConfig,
    captures_len: usize,
}

impl Pcre2Matcher {
    fn unanchored(&self) -> Result<&Regex> {
        self.unanchored
            .get_or_try_init(|| self.settings.build(&self.source))
            .map_err(anyhow::Error::from)
    }

    fn anchored(&self) -> Result<&Regex> {
        self.anchored
            .get_or_try_init(|| {
                let verbose = self.settings.flags.contains(Flags::VERBOSE);
                self.settings
                    .build(&anchor_at_search_start(&self.source, verbose))
            })
            .map_err(anyhow::Error::from)
    }

    fn run(&self, re: &Regex, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>> {
        if from > haystack.len() {
            return Ok(None);
        }
        let mut locs = re.capture_locations();
        if re.captures_read_at(&mut locs, haystack, from)?.is_none() {
            return Ok(None);
        }
        let spans = (0..locs.len()).map(|g| locs.get(g)).collect();
        Ok(Some(MatchOutcome::new(spans, Arc::clone(&self.names))))
    }
}

impl Matcher for Pcre2Matcher {
    fn search_at(&self, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>> {
        self.run(self.unanchored()?, haystack, from)
    }

    fn match_at(&self, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>> {
        self.run(self.anchored()?, haystack, from)
    }

    fn config(&self) -> MatcherConfig {
        self.config
    }

    fn group_names(&self) -> &Arc<GroupNames> {
        &self.names
    }

    fn captures_len(&self) -> usize {
        self.captures_len
    }
}
