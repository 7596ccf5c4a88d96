//! Column widths and live ("on change") resizing.

use super::column::{ColumnSet, MIN_COLUMN_WIDTH};
use std::collections::HashMap;

/// Width of the grab area at the right edge of a resizable header.
pub const RESIZE_HANDLE_WIDTH: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
struct ResizeDrag {
    column: String,
    start_x: f32,
    start_width: f32,
}

/// Current column widths, overriding the columns' initial sizes.
#[derive(Debug, Clone, Default)]
pub struct ColumnSizing {
    widths: HashMap<String, f32>,
    drag: Option<ResizeDrag>,
}

impl ColumnSizing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of `key`, or `None` for an unknown column.
    pub fn width<R>(&self, columns: &ColumnSet<R>, key: &str) -> Option<f32> {
        let column = columns.get(key)?;
        Some(
            self.widths
                .get(key)
                .copied()
                .unwrap_or_else(|| column.initial_size()),
        )
    }

    /// Widths of all columns in order.
    pub fn widths<R>(&self, columns: &ColumnSet<R>) -> Vec<f32> {
        columns
            .iter()
            .map(|c| {
                self.widths
                    .get(c.key())
                    .copied()
                    .unwrap_or_else(|| c.initial_size())
            })
            .collect()
    }

    /// Start dragging the handle of `key` at pointer position `x`.
    ///
    /// Returns false for unknown or non-resizable columns.
    pub fn begin<R>(&mut self, columns: &ColumnSet<R>, key: &str, x: f32) -> bool {
        if !columns.get(key).is_some_and(|c| c.is_resizable()) {
            return false;
        }
        let Some(start_width) = self.width(columns, key) else {
            return false;
        };
        self.drag = Some(ResizeDrag {
            column: key.to_string(),
            start_x: x,
            start_width,
        });
        true
    }

    /// Apply the pointer at `x` to the active drag.
    ///
    /// Returns the resized column and its new width.
    pub fn drag(&mut self, x: f32) -> Option<(String, f32)> {
        let drag = self.drag.as_ref()?;
        if !x.is_finite() {
            return None;
        }
        let width = (drag.start_width + x - drag.start_x).max(MIN_COLUMN_WIDTH);
        let column = drag.column.clone();
        self.widths.insert(column.clone(), width);
        Some((column, width))
    }

    /// Finish the active drag, returning the column that was resized.
    pub fn end(&mut self) -> Option<String> {
        self.drag.take().map(|d| d.column)
    }

    /// Column currently being resized.
    #[must_use]
    pub fn resizing(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.column.as_str())
    }

    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        self.drag.is_some()
    }
}
