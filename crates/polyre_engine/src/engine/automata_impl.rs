// crates/polyre_engine/src/engine/automata_impl.rs
use anyhow::Result;
use regex_automata::meta::{self, BuildError, Regex};
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input, PatternID};
use regex_syntax::{ast, hir};
use std::sync::Arc;

use super::{Engine, Matcher};
use crate::{CompileFailure, Flags, Flavor, GroupNames, MatchOutcome, MatcherConfig};

/// Основной движок: meta-regex из regex-automata (конечные автоматы, без backtracking).
/// Обратные ссылки и look-around не поддерживает — такие паттерны уходят в фолбэк.
pub struct AutomataEngine {
    flavor: Flavor,
    size_limit: Option<usize>,
}

impl AutomataEngine {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            size_limit: None,
        }
    }

    /// Лимит размера NFA. Превышение считается непредставимой конструкцией.
    pub fn with_size_limit(mut self, limit: Option<usize>) -> Self {
        self.size_limit = limit;
        self
    }
}

impl Engine for AutomataEngine {
    fn name(&self) -> &'static str {
        "automata"
    }

    fn flavor(&self) -> Flavor {
        self.flavor
    }

    fn compile(
        &self,
        pattern: &str,
        config: MatcherConfig,
    ) -> std::result::Result<Arc<dyn Matcher>, CompileFailure> {
        let flags = config.flags;
        let text = self.flavor.is_text();
        let syntax = syntax::Config::new()
            .case_insensitive(flags.contains(Flags::IGNORECASE))
            .multi_line(flags.contains(Flags::MULTILINE))
            .dot_matches_new_line(flags.contains(Flags::DOTALL))
            .ignore_whitespace(flags.contains(Flags::VERBOSE))
            .unicode(text && !flags.contains(Flags::ASCII))
            .utf8(text);
        let mut meta_config = meta::Config::new().utf8_empty(text);
        if self.size_limit.is_some() {
            meta_config = meta_config.nfa_size_limit(self.size_limit);
        }

        let re = meta::Builder::new()
            .syntax(syntax)
            .configure(meta_config)
            .build(pattern)
            .map_err(classify_build_error)?;
        let names = GroupNames::from_indexed(re.group_info().pattern_names(PatternID::ZERO));

        Ok(Arc::new(AutomataMatcher {
            re,
            names: Arc::new(names),
            config,
        }))
    }
}

struct AutomataMatcher {
    re: Regex,
    names: Arc<GroupNames>,
    config: MatcherConfig,
}

impl AutomataMatcher {
    fn run(&self, haystack: &[u8], from: usize, anchored: Anchored) -> Option<MatchOutcome> {
        if from > haystack.len() {
            return None;
        }
        let input = Input::new(haystack).range(from..).anchored(anchored);
        let mut caps = self.re.create_captures();
        self.re.search_captures(&input, &mut caps);
        if !caps.is_match() {
            return None;
        }
        let spans = (0..caps.group_len())
            .map(|g| caps.get_group(g).map(|s| (s.start, s.end)))
            .collect();
        Some(MatchOutcome::new(spans, Arc::clone(&self.names)))
    }
}

impl Matcher for AutomataMatcher {
    #[inline]
    fn search_at(&self, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>> {
        Ok(self.run(haystack, from, Anchored::No))
    }

    #[inline]
    fn match_at(&self, haystack: &[u8], from: usize) -> Result<Option<MatchOutcome>> {
        Ok(self.run(haystack, from, Anchored::Yes))
    }

    fn config(&self) -> MatcherConfig {
        self.config
    }

    fn group_names(&self) -> &Arc<GroupNames> {
        &self.names
    }

    fn captures_len(&self) -> usize {
        self.re.captures_len()
    }
}

/// Разбор ошибки сборки: что отдать фолбэку, а что — синтаксис.
/// Позиция в сообщении — символьная, в формате `" at position <N>"`.
fn classify_build_error(err: BuildError) -> CompileFailure {
    if let Some(limit) = err.size_limit() {
        return CompileFailure::Unsupported {
            construct: format!("compiled program exceeds the size limit of {limit} bytes"),
        };
    }
    match err.syntax_error() {
        Some(regex_syntax::Error::Parse(e)) => match e.kind() {
            ast::ErrorKind::UnsupportedBackreference | ast::ErrorKind::UnsupportedLookAround => {
                CompileFailure::Unsupported {
                    construct: e.kind().to_string(),
                }
            }
            // `(?P=name)` regex-syntax читает как группу флагов с флагом `P`
            ast::ErrorKind::FlagUnrecognized if is_named_backreference(e) => {
                CompileFailure::Unsupported {
                    construct: "named backreference (?P=name)".to_string(),
                }
            }
            kind => CompileFailure::Syntax {
                message: format!(
                    "{kind} at position {}",
                    char_position(e.pattern(), e.span().start.offset)
                ),
            },
        },
        Some(regex_syntax::Error::Translate(e)) => match e.kind() {
            hir::ErrorKind::InvalidUtf8 => CompileFailure::Unsupported {
                construct: e.kind().to_string(),
            },
            kind => CompileFailure::Syntax {
                message: format!(
                    "{kind} at position {}",
                    char_position(e.pattern(), e.span().start.offset)
                ),
            },
        },
        Some(other) => CompileFailure::Syntax {
            message: other.to_string(),
        },
        None => CompileFailure::Engine(anyhow::Error::new(err)),
    }
}

fn is_named_backreference(e: &ast::Error) -> bool {
    e.pattern()
        .get(e.span().start.offset..)
        .is_some_and(|rest| rest.starts_with("P="))
}

fn char_position(pattern: &str, byte_offset: usize) -> usize {
    pattern
        .get(..byte_offset)
        .map_or(byte_offset, |head| head.chars().count())
}
