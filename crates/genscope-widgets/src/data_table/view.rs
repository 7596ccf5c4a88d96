//! Renderer-independent description of what the table shows.

use super::cell::CellContent;
use super::sort::SortDirection;
use serde::{Deserialize, Serialize};

/// A header cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub width: f32,
    pub sortable: bool,
    /// Direction shown next to the label, if this is the active sort column
    pub sort: Option<SortDirection>,
    pub resizable: bool,
    /// True while this column's handle is being dragged
    pub resizing: bool,
}

/// A rendered body cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedCell {
    pub column: String,
    pub width: f32,
    pub content: CellContent,
}

/// A body row: either a placeholder for unrendered rows or a data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyRow {
    Spacer {
        height: f32,
    },
    Data {
        /// Position in the sorted order
        position: usize,
        /// Index into the data sequence
        index: usize,
        /// Offset of the row's top edge in the body content
        start: f32,
        height: f32,
        cells: Vec<RenderedCell>,
        clickable: bool,
    },
}

impl BodyRow {
    /// Vertical space taken by the row.
    #[must_use]
    pub const fn height(&self) -> f32 {
        match self {
            Self::Spacer { height } | Self::Data { height, .. } => *height,
        }
    }

    #[must_use]
    pub const fn is_spacer(&self) -> bool {
        matches!(self, Self::Spacer { .. })
    }
}

/// Text shown under the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableStatus {
    Fetching,
    NoData,
}

impl TableStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fetching => "Fetching...",
            Self::NoData => "No data",
        }
    }
}

/// Snapshot of the table for one render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableView {
    pub header: Vec<HeaderCell>,
    pub rows: Vec<BodyRow>,
    pub status: Option<TableStatus>,
}

impl TableView {
    /// Data rows only.
    pub fn data_rows(&self) -> impl Iterator<Item = &BodyRow> {
        self.rows.iter().filter(|r| !r.is_spacer())
    }

    #[must_use]
    pub fn data_row_count(&self) -> usize {
        self.data_rows().count()
    }

    /// Sum of all row and spacer heights.
    #[must_use]
    pub fn body_height(&self) -> f32 {
        self.rows.iter().map(BodyRow::height).sum()
    }

    /// Sum of the header widths.
    #[must_use]
    pub fn total_width(&self) -> f32 {
        self.header.iter().map(|h| h.width).sum()
    }

    /// Plain-text rendering: header, rows, spacers and status, one per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = self
            .header
            .iter()
            .map(|h| match h.sort {
                Some(dir) => format!("{} {}", h.label, dir.indicator()),
                None => h.label.clone(),
            })
            .collect();
        out.push_str(&header.join(" | "));
        out.push('\n');
        for row in &self.rows {
            match row {
                BodyRow::Spacer { height } => {
                    out.push_str(&format!("~ {height}px ~\n"));
                }
                BodyRow::Data { cells, .. } => {
                    let cells: Vec<String> = cells.iter().map(|c| c.content.display()).collect();
                    out.push_str(&cells.join(" | "));
                    out.push('\n');
                }
            }
        }
        if let Some(status) = self.status {
            out.push_str(status.label());
            out.push('\n');
        }
        out
    }
}
