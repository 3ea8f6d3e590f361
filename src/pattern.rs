// src/pattern.rs
//
// Скомпилированный паттерн и слой операций (search / match / fullmatch /
// findall / finditer / sub / split). Все операции сходятся в `run`.
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use polyre_engine::source::{append_end_assertion, bytes_to_engine_source, group_close_order};
use polyre_engine::{Engine, Flags, Flavor, GroupNames, Matcher, MatcherConfig};

use crate::cache::MatcherCache;
use crate::error::{Error, Result};
use crate::haystack::{Haystack, HaystackBuf};
use crate::matched::Match;
use crate::replacer::Replacer;
use crate::template::Template;

/// Режим исполнения: определяет текст для движка и sticky.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Search,
    Match,
    Fullmatch,
}

/// Элемент результата `findall`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Found<'h> {
    /// Всё совпадение (нет групп) или группа 1 (ровно одна группа).
    Single(Haystack<'h>),
    /// Все группы, если их больше одной. Неучаствовавшие группы пустые.
    Groups(Vec<Haystack<'h>>),
}

/// Скомпилированный паттерн. Неизменяем, кроме внутреннего кэша матчеров;
/// можно делить между потоками через `Arc`.
pub struct Pattern {
    source: HaystackBuf,
    engine_source: String,
    flags: Flags,
    engine: Arc<dyn Engine>,
    cache: MatcherCache,
    names: Arc<GroupNames>,
    /// Включая группу 0.
    group_count: usize,
    close_order: Arc<[usize]>,
    fullmatch_source: OnceCell<String>,
}

impl Pattern {
    /// Компиляция под конкретный движок. Ошибки синтаксиса всплывают сразу, не при первом поиске.
    pub fn new<'p>(
        engine: Arc<dyn Engine>,
        pattern: impl Into<Haystack<'p>>,
        flags: Flags,
    ) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.flavor() != engine.flavor() {
            return Err(Error::flavor_mismatch(engine.flavor(), pattern.flavor()));
        }
        let flags = effective_flags(pattern, flags)?;
        let engine_source = match pattern {
            Haystack::Text(s) => s.to_string(),
            Haystack::Bytes(b) => bytes_to_engine_source(b).into_owned(),
        };

        let cache = MatcherCache::new();
        let base = cache.get_or_compile(engine.as_ref(), &engine_source, MatcherConfig::new(flags))?;
        let names = Arc::clone(base.group_names());
        let group_count = base.captures_len();
        let mut close_order = group_close_order(&engine_source, flags.contains(Flags::VERBOSE));
        if close_order.len() != group_count {
            // синтаксис, который сканер не понял: порядок номеров
            close_order = (0..group_count).collect();
            close_order[0] = usize::MAX;
        }

        tracing::debug!(
            pattern = %engine_source,
            %flags,
            groups = group_count - 1,
            "pattern compiled"
        );

        Ok(Self {
            source: pattern.to_owned_buf(),
            engine_source,
            flags,
            engine,
            cache,
            names,
            group_count,
            close_order: close_order.into(),
            fullmatch_source: OnceCell::new(),
        })
    }

    /// Исходный текст паттерна.
    pub fn pattern(&self) -> Haystack<'_> {
        self.source.as_haystack()
    }

    /// Флаги, включая неявный UNICODE у текстовых паттернов.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Имя группы -> номер.
    pub fn groupindex(&self) -> &GroupNames {
        &self.names
    }

    /// Число захватывающих групп (без группы 0).
    pub fn groups(&self) -> usize {
        self.group_count - 1
    }

    pub fn flavor(&self) -> Flavor {
        self.engine.flavor()
    }

    pub fn search<'h>(&self, haystack: impl Into<Haystack<'h>>) -> Result<Option<Match<'h>>> {
        self.search_at(haystack, 0, None)
    }

    pub fn search_at<'h>(
        &self,
        haystack: impl Into<Haystack<'h>>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'h>>> {
        self.locate(Mode::Search, haystack.into(), pos, endpos)
    }

    /// Совпадение, начинающееся ровно в начале (не обязано доходить до конца).
    pub fn match_<'h>(&self, haystack: impl Into<Haystack<'h>>) -> Result<Option<Match<'h>>> {
        self.match_at(haystack, 0, None)
    }

    pub fn match_at<'h>(
        &self,
        haystack: impl Into<Haystack<'h>>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'h>>> {
        self.locate(Mode::Match, haystack.into(), pos, endpos)
    }

    /// Совпадение, покрывающее окно целиком.
    pub fn fullmatch<'h>(&self, haystack: impl Into<Haystack<'h>>) -> Result<Option<Match<'h>>> {
        self.fullmatch_at(haystack, 0, None)
    }

    pub fn fullmatch_at<'h>(
        &self,
        haystack: impl Into<Haystack<'h>>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'h>>> {
        self.locate(Mode::Fullmatch, haystack.into(), pos, endpos)
    }

    pub fn findall<'h>(&self, haystack: impl Into<Haystack<'h>>) -> Result<Vec<Found<'h>>> {
        self.findall_at(haystack, 0, None)
    }

    pub fn findall_at<'h>(
        &self,
        haystack: impl Into<Haystack<'h>>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Vec<Found<'h>>> {
        self.finditer_at(haystack, pos, endpos)?
            .map(|m| m.map(|m| self.found(&m)))
            .collect()
    }

    pub fn finditer<'p, 'h>(&'p self, haystack: impl Into<Haystack<'h>>) -> Result<FindIter<'p, 'h>> {
        self.finditer_at(haystack, 0, None)
    }

    /// Ленивый обход совпадений. Тип входа и компиляция проверяются сразу.
    pub fn finditer_at<'p, 'h>(
        &'p self,
        haystack: impl Into<Haystack<'h>>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<FindIter<'p, 'h>> {
        let haystack = haystack.into();
        self.check_flavor(haystack)?;
        let matcher = self.matcher(Mode::Search)?;
        let limit = endpos.map_or(haystack.len(), |e| e.min(haystack.len()));
        Ok(FindIter {
            pattern: self,
            matcher,
            haystack,
            next: Some(pos),
            endpos,
            limit,
        })
    }

    /// Замена первых `count` совпадений (0 = всех).
    pub fn sub<'h, R: Replacer>(
        &self,
        repl: R,
        haystack: impl Into<Haystack<'h>>,
        count: usize,
    ) -> Result<HaystackBuf> {
        Ok(self.subn(repl, haystack, count)?.0)
    }

    /// Как [`Pattern::sub`], плюс число сделанных замен.
    pub fn subn<'h, R: Replacer>(
        &self,
        mut repl: R,
        haystack: impl Into<Haystack<'h>>,
        count: usize,
    ) -> Result<(HaystackBuf, usize)> {
        let haystack = haystack.into();
        self.check_flavor(haystack)?;

        // копия, чтобы разобранный шаблон не держал заём `repl`
        let literal = repl.template().map(|t| t.to_owned_buf());
        let template = match &literal {
            Some(text) => {
                self.check_flavor(text.as_haystack())?;
                Some(Template::parse(text.as_haystack(), &self.names, Some(self.group_count))?)
            }
            None => None,
        };

        let matcher = self.matcher(Mode::Search)?;
        let mut out = HaystackBuf::new(self.flavor());
        let mut pos = 0;
        let mut n = 0;
        while (count == 0 || n < count) && pos <= haystack.len() {
            let Some(m) = self.run(matcher.as_ref(), haystack, pos, None)? else {
                break;
            };
            n += 1;
            let found = m.range();
            out.push(haystack.slice(pos..found.start))?;
            match &template {
                Some(template) => template.expand(&m, &mut out)?,
                None => out.push(repl.replace(&m)?.as_haystack())?,
            }
            pos = found.end;
            if found.is_empty() {
                // пустое совпадение: переносим один символ входа как есть
                let next = haystack.next_unit(pos);
                if pos < haystack.len() {
                    out.push(haystack.slice(pos..next))?;
                }
                pos = next;
            }
        }
        out.push(haystack.tail(pos))?;

        tracing::trace!(replaced = n, "sub finished");
        Ok((out, n))
    }

    /// Разбиение по совпадениям; после каждого куска идут захваченные группы
    /// (`None` для неучаствовавших). `maxsplit == 0` — без ограничения.
    pub fn split<'h>(
        &self,
        haystack: impl Into<Haystack<'h>>,
        maxsplit: usize,
    ) -> Result<Vec<Option<Haystack<'h>>>> {
        let haystack = haystack.into();
        self.check_flavor(haystack)?;
        let matcher = self.matcher(Mode::Search)?;

        let mut out = Vec::new();
        let mut collect = 0;
        let mut search = 0;
        let mut n = 0;
        while (maxsplit == 0 || n < maxsplit) && search <= haystack.len() {
            let Some(m) = self.run(matcher.as_ref(), haystack, search, None)? else {
                break;
            };
            n += 1;
            let found = m.range();
            out.push(Some(haystack.slice(collect..found.start)));
            out.extend((1..m.len()).map(|g| m.group_at(g)));
            collect = found.end;
            search = if found.is_empty() {
                haystack.next_unit(found.end)
            } else {
                found.end
            };
        }
        out.push(Some(haystack.tail(collect)));
        Ok(out)
    }

    fn check_flavor(&self, input: Haystack<'_>) -> Result<()> {
        if input.flavor() == self.flavor() {
            Ok(())
        } else {
            Err(Error::flavor_mismatch(self.flavor(), input.flavor()))
        }
    }

    fn matcher(&self, mode: Mode) -> Result<Arc<dyn Matcher>> {
        let config = MatcherConfig::new(self.flags);
        match mode {
            Mode::Search => self
                .cache
                .get_or_compile(self.engine.as_ref(), &self.engine_source, config),
            Mode::Match => self.cache.get_or_compile(
                self.engine.as_ref(),
                &self.engine_source,
                config.with_sticky(true),
            ),
            Mode::Fullmatch => {
                let source = self.fullmatch_source.get_or_init(|| {
                    append_end_assertion(&self.engine_source, self.flags.contains(Flags::VERBOSE))
                        .into_owned()
                });
                self.cache
                    .get_or_compile(self.engine.as_ref(), source, config.with_sticky(true))
            }
        }
    }

    fn locate<'h>(
        &self,
        mode: Mode,
        haystack: Haystack<'h>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'h>>> {
        self.check_flavor(haystack)?;
        let matcher = self.matcher(mode)?;
        self.run(matcher.as_ref(), haystack, pos, endpos)
    }

    /// Одна попытка в окне `[..endpos]`, начиная с `pos`.
    fn run<'h>(
        &self,
        matcher: &dyn Matcher,
        haystack: Haystack<'h>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Result<Option<Match<'h>>> {
        let window = match endpos {
            Some(end) if end < haystack.len() => haystack.slice(0..haystack.floor_boundary(end)),
            _ => haystack,
        };
        if pos > window.len() {
            return Ok(None);
        }
        let from = window.ceil_boundary(pos);
        let outcome = matcher.execute(window.as_bytes(), from)?;
        Ok(outcome.map(|outcome| {
            Match::new(haystack, outcome, Arc::clone(&self.close_order), pos, endpos)
        }))
    }

    fn found<'h>(&self, m: &Match<'h>) -> Found<'h> {
        let empty = Haystack::empty(self.flavor());
        match self.group_count {
            1 => Found::Single(m.matched()),
            2 => Found::Single(m.group_at(1).unwrap_or(empty)),
            _ => Found::Groups(
                m.groups_or(Some(empty))
                    .into_iter()
                    .map(|g| g.unwrap_or(empty))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.flags;
        if self.flavor().is_text() {
            shown.remove(Flags::UNICODE);
        }
        if shown.is_empty() {
            write!(f, "re.compile({})", self.source)
        } else {
            write!(f, "re.compile({}, {shown})", self.source)
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("flags", &self.flags)
            .field("engine", &self.engine.name())
            .field("groups", &self.groups())
            .field("cached_matchers", &self.cache.len())
            .finish()
    }
}

/// Итератор совпадений: после пустого совпадения сдвигается на одну единицу входа.
pub struct FindIter<'p, 'h> {
    pattern: &'p Pattern,
    matcher: Arc<dyn Matcher>,
    haystack: Haystack<'h>,
    /// `None` — обход закончен.
    next: Option<usize>,
    endpos: Option<usize>,
    limit: usize,
}

impl<'h> Iterator for FindIter<'_, 'h> {
    type Item = Result<Match<'h>>;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.next.take().filter(|pos| *pos <= self.limit)?;
        match self
            .pattern
            .run(self.matcher.as_ref(), self.haystack, pos, self.endpos)
        {
            Ok(Some(m)) => {
                let found = m.range();
                self.next = Some(if found.is_empty() {
                    self.haystack.next_unit(found.end)
                } else {
                    found.end
                });
                Some(Ok(m))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Текстовые паттерны без ASCII неявно получают UNICODE; несовместимые сочетания отвергаются.
fn effective_flags(pattern: Haystack<'_>, mut flags: Flags) -> Result<Flags> {
    let invalid = |message: &str| Error::Compile {
        message: message.to_string(),
        pattern: match pattern {
            Haystack::Text(s) => s.to_string(),
            Haystack::Bytes(b) => bytes_to_engine_source(b).into_owned(),
        },
        position: None,
    };
    match pattern.flavor() {
        Flavor::Text => {
            if flags.contains(Flags::LOCALE) {
                return Err(invalid("cannot use LOCALE flag with a str pattern"));
            }
            if flags.contains(Flags::ASCII | Flags::UNICODE) {
                return Err(invalid("ASCII and UNICODE flags are incompatible"));
            }
            if !flags.contains(Flags::ASCII) {
                flags.insert(Flags::UNICODE);
            }
        }
        Flavor::Bytes => {
            if flags.contains(Flags::UNICODE) {
                return Err(invalid("cannot use UNICODE flag with a bytes pattern"));
            }
        }
    }
    Ok(flags)
}
