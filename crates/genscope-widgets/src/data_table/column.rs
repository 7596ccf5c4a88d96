//! Column definitions.

use super::cell::{CellContent, CellValue};
use super::error::TableError;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Width used when a column does not set one.
pub const DEFAULT_COLUMN_WIDTH: f32 = 150.0;
/// Smallest width a column can be resized to.
pub const MIN_COLUMN_WIDTH: f32 = 20.0;

/// Extracts the sortable/displayable value of a row.
pub type Accessor<R> = Arc<dyn Fn(&R) -> CellValue + Send + Sync>;
/// Custom ascending comparator over two rows.
pub type SortingFn<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;
/// Custom cell renderer.
pub type CellRenderer<R> = Arc<dyn Fn(&CellValue, &R) -> CellContent + Send + Sync>;

/// Describes one table column.
pub struct ColumnDef<R> {
    key: String,
    header: String,
    size: f32,
    enable_resizing: bool,
    enable_sorting: bool,
    accessor: Accessor<R>,
    sorting_fn: Option<SortingFn<R>>,
    cell: Option<CellRenderer<R>>,
}

impl<R> ColumnDef<R> {
    /// Column whose value is produced by `accessor`.
    pub fn accessor(
        key: impl Into<String>,
        header: impl Into<String>,
        accessor: impl Fn(&R) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            size: DEFAULT_COLUMN_WIDTH,
            enable_resizing: true,
            enable_sorting: true,
            accessor: Arc::new(accessor),
            sorting_fn: None,
            cell: None,
        }
    }

    /// Set the initial width in pixels.
    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Enable or disable resizing.
    #[must_use]
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.enable_resizing = resizable;
        self
    }

    /// Enable or disable sorting.
    #[must_use]
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.enable_sorting = sortable;
        self
    }

    /// Replace the generic value comparison with a custom one.
    #[must_use]
    pub fn sorting_fn(mut self, f: impl Fn(&R, &R) -> Ordering + Send + Sync + 'static) -> Self {
        self.sorting_fn = Some(Arc::new(f));
        self
    }

    /// Render cells with `f` instead of the value's text.
    #[must_use]
    pub fn cell(mut self, f: impl Fn(&CellValue, &R) -> CellContent + Send + Sync + 'static) -> Self {
        self.cell = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Initial width.
    #[must_use]
    pub const fn initial_size(&self) -> f32 {
        self.size
    }

    #[must_use]
    pub const fn is_resizable(&self) -> bool {
        self.enable_resizing
    }

    #[must_use]
    pub const fn is_sortable(&self) -> bool {
        self.enable_sorting
    }

    /// Extract the column value of `row`.
    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Ascending comparison of two rows under this column.
    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        match &self.sorting_fn {
            Some(f) => f(a, b),
            None => self.value(a).compare(&self.value(b)),
        }
    }

    /// Content to display for `row`.
    pub fn render(&self, row: &R) -> CellContent {
        let value = self.value(row);
        match &self.cell {
            Some(f) => f(&value, row),
            None => CellContent::from(&value),
        }
    }
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            size: self.size,
            enable_resizing: self.enable_resizing,
            enable_sorting: self.enable_sorting,
            accessor: Arc::clone(&self.accessor),
            sorting_fn: self.sorting_fn.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("size", &self.size)
            .field("enable_resizing", &self.enable_resizing)
            .field("enable_sorting", &self.enable_sorting)
            .field("custom_sort", &self.sorting_fn.is_some())
            .field("custom_cell", &self.cell.is_some())
            .finish_non_exhaustive()
    }
}

/// An ordered set of columns with unique keys.
pub struct ColumnSet<R> {
    columns: Vec<ColumnDef<R>>,
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}

impl<R> ColumnSet<R> {
    /// Validate and build a column set.
    pub fn new(columns: Vec<ColumnDef<R>>) -> Result<Self, TableError> {
        for (i, column) in columns.iter().enumerate() {
            if !column.size.is_finite() || column.size <= 0.0 {
                return Err(TableError::InvalidWidth {
                    column: column.key.clone(),
                    width: column.size,
                });
            }
            if columns[..i].iter().any(|c| c.key == column.key) {
                return Err(TableError::DuplicateColumn(column.key.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// A set with no columns.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDef<R>> {
        self.columns.iter()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ColumnDef<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<'a, R> IntoIterator for &'a ColumnSet<R> {
    type Item = &'a ColumnDef<R>;
    type IntoIter = std::slice::Iter<'a, ColumnDef<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
