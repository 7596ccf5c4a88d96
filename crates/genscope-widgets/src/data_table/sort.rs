//! Sort state and row ordering.

use super::column::ColumnSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Key of the column sorted by default.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn from_desc(desc: bool) -> Self {
        if desc {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    #[must_use]
    pub const fn is_desc(self) -> bool {
        matches!(self, Self::Descending)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header chevron.
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortEntry {
    pub column: String,
    pub desc: bool,
}

impl SortEntry {
    pub fn new(column: impl Into<String>, desc: bool) -> Self {
        Self {
            column: column.into(),
            desc,
        }
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        SortDirection::from_desc(self.desc)
    }
}

/// Ordered sort keys; the header toggle keeps at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    entries: Vec<SortEntry>,
}

impl Default for SortState {
    fn default() -> Self {
        Self::by(DEFAULT_SORT_COLUMN, true)
    }
}

impl SortState {
    /// No sorting: rows keep their data order.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sort by a single column.
    pub fn by(column: impl Into<String>, desc: bool) -> Self {
        Self {
            entries: vec![SortEntry::new(column, desc)],
        }
    }

    #[must_use]
    pub fn from_entries(entries: Vec<SortEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    /// The primary sort entry.
    #[must_use]
    pub fn active(&self) -> Option<&SortEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direction the given column is sorted in, if it is the active column.
    #[must_use]
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.active()
            .filter(|e| e.column == column)
            .map(SortEntry::direction)
    }

    /// Flip the active column or switch to `column` ascending.
    pub fn toggle(&mut self, column: &str) -> SortDirection {
        let direction = match self.direction_of(column) {
            Some(current) => current.toggled(),
            None => SortDirection::Ascending,
        };
        self.entries = vec![SortEntry::new(column, direction.is_desc())];
        direction
    }
}

/// Compute the display order of `rows` as indices into `rows`.
///
/// The sort is stable. Entries naming unknown or non-sortable columns are
/// skipped, so a state with only such entries keeps the data order.
pub fn sorted_order<R>(rows: &[R], columns: &ColumnSet<R>, sort: &SortState) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    let keys: Vec<_> = sort
        .entries()
        .iter()
        .filter_map(|entry| {
            columns
                .get(&entry.column)
                .filter(|c| c.is_sortable())
                .map(|c| (c, entry.desc))
        })
        .collect();
    if keys.is_empty() {
        return order;
    }

    order.sort_by(|&a, &b| {
        keys.iter()
            .map(|(column, desc)| {
                let ord = column.compare(&rows[a], &rows[b]);
                if *desc {
                    ord.reverse()
                } else {
                    ord
                }
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    order
}
