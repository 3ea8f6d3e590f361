use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use polyre_engine::MatchOutcome;

use crate::error::{Error, Result};
use crate::haystack::{Haystack, HaystackBuf};
use crate::template::Template;

/// Ссылка на группу: номер или объявленное имя.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupRef<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for GroupRef<'_> {
    fn from(i: usize) -> Self {
        GroupRef::Index(i)
    }
}

impl From<u32> for GroupRef<'_> {
    fn from(i: u32) -> Self {
        GroupRef::Index(i as usize)
    }
}

impl From<i32> for GroupRef<'_> {
    fn from(i: i32) -> Self {
        // отрицательный номер не найдётся никогда
        GroupRef::Index(usize::try_from(i).unwrap_or(usize::MAX))
    }
}

impl<'a> From<&'a str> for GroupRef<'a> {
    fn from(name: &'a str) -> Self {
        GroupRef::Name(name)
    }
}

impl fmt::Display for GroupRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Index(i) => write!(f, "{i}"),
            GroupRef::Name(n) => write!(f, "{n:?}"),
        }
    }
}

/// Одно совпадение: спаны движка поверх входа, в котором искали. Только чтение.
#[derive(Debug, Clone)]
pub struct Match<'h> {
    haystack: Haystack<'h>,
    outcome: MatchOutcome,
    close_order: Arc<[usize]>,
    pos: usize,
    endpos: Option<usize>,
}

impl<'h> Match<'h> {
    pub(crate) fn new(
        haystack: Haystack<'h>,
        outcome: MatchOutcome,
        close_order: Arc<[usize]>,
        pos: usize,
        endpos: Option<usize>,
    ) -> Self {
        Self {
            haystack,
            outcome,
            close_order,
            pos,
            endpos,
        }
    }

    fn index(&self, group: GroupRef<'_>) -> Result<usize> {
        let found = match group {
            GroupRef::Index(i) => (i < self.outcome.group_count()).then_some(i),
            GroupRef::Name(name) => self.outcome.names().get(name),
        };
        found.ok_or_else(|| Error::NoSuchGroup {
            group: group.to_string(),
        })
    }

    pub(crate) fn group_at(&self, index: usize) -> Option<Haystack<'h>> {
        self.outcome
            .span(index)
            .map(|(start, end)| self.haystack.slice(start..end))
    }

    /// Текст всего совпадения.
    pub fn matched(&self) -> Haystack<'h> {
        let (start, end) = self.outcome.bounds();
        self.haystack.slice(start..end)
    }

    /// Текст группы; `None`, если группа не участвовала.
    pub fn group<'a>(&self, group: impl Into<GroupRef<'a>>) -> Result<Option<Haystack<'h>>> {
        let index = self.index(group.into())?;
        Ok(self.group_at(index))
    }

    /// Несколько групп сразу, правило то же, что у [`Match::group`].
    pub fn group_many<'a, I>(&self, groups: I) -> Result<Vec<Option<Haystack<'h>>>>
    where
        I: IntoIterator,
        I::Item: Into<GroupRef<'a>>,
    {
        groups.into_iter().map(|g| self.group(g)).collect()
    }

    /// Группы `1..N`, `None` для неучаствовавших.
    pub fn groups(&self) -> Vec<Option<Haystack<'h>>> {
        self.groups_or(None)
    }

    /// Группы `1..N`, `default` для неучаствовавших.
    pub fn groups_or(&self, default: Option<Haystack<'h>>) -> Vec<Option<Haystack<'h>>> {
        (1..self.outcome.group_count())
            .map(|i| self.group_at(i).or(default))
            .collect()
    }

    /// Именованные группы в порядке движка.
    pub fn groupdict(&self) -> Vec<(&str, Option<Haystack<'h>>)> {
        self.groupdict_or(None)
    }

    pub fn groupdict_or(&self, default: Option<Haystack<'h>>) -> Vec<(&str, Option<Haystack<'h>>)> {
        self.outcome
            .names()
            .iter()
            .map(|(name, index)| (name, self.group_at(index).or(default)))
            .collect()
    }

    pub fn span<'a>(&self, group: impl Into<GroupRef<'a>>) -> Result<Option<(usize, usize)>> {
        let index = self.index(group.into())?;
        Ok(self.outcome.span(index))
    }

    pub fn start<'a>(&self, group: impl Into<GroupRef<'a>>) -> Result<Option<usize>> {
        Ok(self.span(group)?.map(|(start, _)| start))
    }

    pub fn end<'a>(&self, group: impl Into<GroupRef<'a>>) -> Result<Option<usize>> {
        Ok(self.span(group)?.map(|(_, end)| end))
    }

    /// Границы всего совпадения.
    pub fn range(&self) -> Range<usize> {
        let (start, end) = self.outcome.bounds();
        start..end
    }

    /// Вход, в котором нашлось совпадение (не обрезан по `endpos`).
    pub fn string(&self) -> Haystack<'h> {
        self.haystack
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn endpos(&self) -> Option<usize> {
        self.endpos
    }

    /// Число групп вместе с группой 0.
    pub fn len(&self) -> usize {
        self.outcome.group_count()
    }

    pub fn is_empty(&self) -> bool {
        self.range().is_empty()
    }

    /// Номер участвовавшей группы, закрывшейся последней: наибольший конец,
    /// при равенстве — чья закрывающая скобка правее в паттерне.
    pub fn lastindex(&self) -> Option<usize> {
        let rank = |index: usize| self.close_order.get(index).copied().unwrap_or(index);
        (1..self.outcome.group_count())
            .filter_map(|index| self.outcome.span(index).map(|(_, end)| (end, rank(index), index)))
            .max()
            .map(|(_, _, index)| index)
    }

    pub fn lastgroup(&self) -> Option<&str> {
        self.lastindex()
            .and_then(|index| self.outcome.names().name_of(index))
    }

    /// Подстановка обратных ссылок `template` по этому совпадению.
    pub fn expand<'t>(&self, template: impl Into<Haystack<'t>>) -> Result<HaystackBuf> {
        let template = template.into();
        if template.flavor() != self.haystack.flavor() {
            return Err(Error::flavor_mismatch(self.haystack.flavor(), template.flavor()));
        }
        let template = Template::parse(template, self.outcome.names(), Some(self.len()))?;
        let mut out = HaystackBuf::new(self.haystack.flavor());
        template.expand(self, &mut out)?;
        Ok(out)
    }
}

impl fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.outcome.bounds();
        write!(
            f,
            "<polyre.Match object; span=({start}, {end}), match={}>",
            self.matched()
        )
    }
}
