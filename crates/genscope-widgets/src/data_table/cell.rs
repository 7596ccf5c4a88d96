//! Cell values (what a column extracts) and cell content (what it shows).

use genscope_core::Color;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A value extracted from a row for sorting and default rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Text value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Missing value
    Empty,
}

impl CellValue {
    /// Get display text for the cell.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.is_nan() => String::new(),
            Self::Number(n) => format!("{n}"),
            Self::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
            Self::Empty => String::new(),
        }
    }

    /// Numeric view of the value, if it is a finite number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Total, ascending comparison.
    ///
    /// Same-kind values compare naturally. NaN is greater than every number
    /// and equal to itself. Mixed kinds rank `Bool < Number < Text < Empty`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.total_cmp(b),
            },
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
            Self::Empty => 3,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Displayable content of a rendered cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellContent {
    /// Plain text
    Text(String),
    /// Colored pill
    Badge {
        /// Badge text
        label: String,
        /// Badge color
        color: Color,
    },
    /// Short preview of a longer sequence (e.g. the last chat message)
    Preview {
        /// Preview text
        text: String,
        /// Number of entries behind the preview
        total: usize,
    },
    /// Nothing to show
    Empty,
}

impl CellContent {
    /// Plain text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Badge content.
    pub fn badge(label: impl Into<String>, color: Color) -> Self {
        Self::Badge {
            label: label.into(),
            color,
        }
    }

    /// Text suitable for a text-only backend.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Badge { label, .. } => format!("[{label}]"),
            Self::Preview { text, total } if *total > 1 => format!("{text} (view all {total})"),
            Self::Preview { text, .. } => text.clone(),
            Self::Empty => String::new(),
        }
    }

    /// True for [`CellContent::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<&CellValue> for CellContent {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => Self::Empty,
            CellValue::Number(n) if n.is_nan() => Self::Empty,
            other => Self::Text(other.display()),
        }
    }
}
