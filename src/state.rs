//! Ephemeral view state owned by one table instance.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identity of a row: its position in the data most recently supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RowId(pub usize);

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Ascending => " \u{25B2}",
            SortDirection::Descending => " \u{25BC}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Parse `column` or `column:asc` / `column:desc`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (column, direction) = match spec.split_once(':') {
            Some((column, "asc")) => (column, SortDirection::Ascending),
            Some((column, "desc")) => (column, SortDirection::Descending),
            Some(_) => return None,
            None => (spec, SortDirection::Ascending),
        };
        if column.is_empty() {
            return None;
        }
        Some(Self::new(column, direction))
    }
}

/// Ordered sort keys; empty means insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

/// none -> ascending -> descending -> none
fn cycle(current: Option<SortDirection>) -> Option<SortDirection> {
    match current {
        None => Some(SortDirection::Ascending),
        Some(SortDirection::Ascending) => Some(SortDirection::Descending),
        Some(SortDirection::Descending) => None,
    }
}

impl SortState {
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn set(&mut self, keys: Vec<SortKey>) {
        self.keys = keys;
    }

    /// Direction and zero-based priority of a column, if sorted.
    pub fn direction_of(&self, column: &str) -> Option<(SortDirection, usize)> {
        self.keys
            .iter()
            .position(|k| k.column == column)
            .map(|i| (self.keys[i].direction, i))
    }

    /// Cycle one column and make it the only sort key.
    pub fn toggle(&mut self, column: &str) {
        let next = cycle(self.direction_of(column).map(|(d, _)| d));
        self.keys.clear();
        if let Some(direction) = next {
            self.keys.push(SortKey::new(column, direction));
        }
    }

    /// Cycle one column, keeping the other keys in place.
    pub fn toggle_multi(&mut self, column: &str) {
        match self.keys.iter().position(|k| k.column == column) {
            Some(i) => match cycle(Some(self.keys[i].direction)) {
                Some(direction) => self.keys[i].direction = direction,
                None => {
                    self.keys.remove(i);
                }
            },
            None => self.keys.push(SortKey::new(column, SortDirection::Ascending)),
        }
    }
}

/// Free-text filter per column. Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    filters: BTreeMap<String, String>,
}

impl FilterState {
    /// Returns true if the stored filter changed.
    pub fn set(&mut self, column: &str, value: &str) -> bool {
        if value.is_empty() {
            return self.filters.remove(column).is_some();
        }
        match self.filters.get(column) {
            Some(existing) if existing == value => false,
            _ => {
                self.filters.insert(column.to_string(), value.to_string());
                true
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.filters.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.filters.is_empty();
        self.filters.clear();
        changed
    }
}

/// Column id -> visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    columns: BTreeMap<String, bool>,
}

impl VisibilityState {
    pub fn set(&mut self, column: &str, visible: bool) {
        self.columns.insert(column.to_string(), visible);
    }

    /// Columns never mentioned are visible.
    pub fn is_visible(&self, column: &str) -> bool {
        self.columns.get(column).copied().unwrap_or(true)
    }
}

/// Selected rows, kept in data order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<RowId>,
}

impl SelectionState {
    pub fn contains(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.selected.iter().copied()
    }

    pub fn toggle(&mut self, id: RowId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Replace the selection; returns true if it changed.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = RowId>) -> bool {
        let next: BTreeSet<RowId> = ids.into_iter().collect();
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Drop ids the predicate rejects; returns true if any were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(RowId) -> bool) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| keep(*id));
        before != self.selected.len()
    }
}
