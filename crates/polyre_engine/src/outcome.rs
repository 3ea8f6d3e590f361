// crates/polyre_engine/src/outcome.rs
use std::collections::HashMap;
use std::sync::Arc;

/// Вид входа: текст или последовательность байт. Фиксируется при компиляции паттерна.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flavor {
    Text,
    Bytes,
}

impl Flavor {
    pub fn is_text(self) -> bool {
        matches!(self, Flavor::Text)
    }
}

/// Таблица именованных групп: имя -> индекс (1-based), в порядке, в котором её отдал движок.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupNames {
    ordered: Vec<(String, usize)>,
    by_name: HashMap<String, usize>,
}

impl GroupNames {
    /// Строит таблицу из последовательности «индекс группы -> имя (если есть)».
    pub fn from_indexed<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut out = GroupNames::default();
        for (index, name) in names.into_iter().enumerate() {
            if let Some(name) = name {
                if out.by_name.contains_key(name) {
                    continue;
                }
                out.by_name.insert(name.to_string(), index);
                out.ordered.push((name.to_string(), index));
            }
        }
        out
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.ordered
            .iter()
            .find(|(_, i)| *i == index)
            .map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.ordered.iter().map(|(n, i)| (n.as_str(), *i))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Сырой результат движка для одной успешной попытки.
///
/// `spans[i]` — границы группы `i` (байтовые смещения), `None` если группа не участвовала.
/// Длина всегда равна числу групп + 1, `spans[0]` — всё совпадение.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    spans: Vec<Option<(usize, usize)>>,
    names: Arc<GroupNames>,
}

impl MatchOutcome {
    pub fn new(spans: Vec<Option<(usize, usize)>>, names: Arc<GroupNames>) -> Self {
        debug_assert!(
            spans.first().is_some_and(Option::is_some),
            "group 0 must participate in a successful match"
        );
        Self { spans, names }
    }

    /// Число групп, включая группу 0.
    pub fn group_count(&self) -> usize {
        self.spans.len()
    }

    pub fn span(&self, group: usize) -> Option<(usize, usize)> {
        self.spans.get(group).copied().flatten()
    }

    /// Границы всего совпадения.
    pub fn bounds(&self) -> (usize, usize) {
        self.span(0).unwrap_or((0, 0))
    }

    pub fn spans(&self) -> &[Option<(usize, usize)>] {
        &self.spans
    }

    /// Таблица имён того движка, который реально произвёл совпадение.
    pub fn names(&self) -> &Arc<GroupNames> {
        &self.names
    }
}
