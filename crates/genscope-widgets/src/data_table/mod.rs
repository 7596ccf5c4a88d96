//! Virtualized data table widget.
//!
//! [`VirtualizedTable`] shows a possibly very long, lazily grown sequence of
//! records. Only the rows intersecting the viewport are rendered; spacers
//! stand in for the rest. Header clicks sort, header edges resize, and
//! scrolling near the bottom asks the host for more rows.

mod cell;
mod column;
mod error;
mod sizing;
mod sort;
mod view;

pub use cell::{CellContent, CellValue};
pub use column::{
    Accessor, CellRenderer, ColumnDef, ColumnSet, SortingFn, DEFAULT_COLUMN_WIDTH,
    MIN_COLUMN_WIDTH,
};
pub use error::TableError;
pub use sizing::{ColumnSizing, RESIZE_HANDLE_WIDTH};
pub use sort::{sorted_order, SortDirection, SortEntry, SortState, DEFAULT_SORT_COLUMN};
pub use view::{BodyRow, HeaderCell, RenderedCell, TableStatus, TableView};

use genscope_core::{
    widget::{AccessibleRole, FontWeight, LayoutResult, TextStyle},
    Canvas, Color, Constraints, CursorStyle, Event, LoadMoreTrigger, MouseButton, Point, Rect,
    Size, TypeId, ViewportMetrics, ViewportProbe, VirtualRows, VirtualRowsConfig, VirtualWindow,
    Widget, DEFAULT_LOAD_MORE_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default header row height.
pub const DEFAULT_HEADER_HEIGHT: f32 = 36.0;
/// Height reserved under the rows for the status line.
const STATUS_HEIGHT: f32 = 40.0;

/// Called with the original record of a clicked row.
pub type RowClickFn<R> = Arc<dyn Fn(&R) + Send + Sync>;
/// Called when the viewport nears the bottom.
pub type LoadMoreFn = Arc<dyn Fn() + Send + Sync>;

/// Sizing and trigger options for a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    pub rows: VirtualRowsConfig,
    pub header_height: f32,
    pub load_more_threshold: f32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            rows: VirtualRowsConfig::default(),
            header_height: DEFAULT_HEADER_HEIGHT,
            load_more_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
        }
    }
}

/// Message emitted when table sorting changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSortChanged {
    /// Column key being sorted
    pub column: String,
    /// Sort direction
    pub direction: SortDirection,
}

/// Message emitted when a row is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowClicked {
    /// Position in the sorted order
    pub position: usize,
    /// Index into the data sequence
    pub index: usize,
}

/// Message emitted while a column is being resized.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnResized {
    pub column: String,
    pub width: f32,
}

/// Message emitted after a scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct TableScrolled {
    /// Scroll offset after clamping
    pub offset: f32,
    /// Whether the load-more callback ran
    pub load_more_requested: bool,
}

/// What lies under a point of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableHit {
    Header { column: String, handle: bool },
    /// Row at this position in the sorted order
    Row(usize),
    None,
}

/// Virtualized, sortable, resizable table over `Arc<[R]>`.
pub struct VirtualizedTable<R> {
    columns: ColumnSet<R>,
    data: Option<Arc<[R]>>,
    /// Sorted order as indices into `data`
    order: Vec<usize>,
    loading: bool,
    sort: SortState,
    sizing: ColumnSizing,
    rows: VirtualRows,
    trigger: LoadMoreTrigger,
    header_height: f32,
    on_row_clicked: Option<RowClickFn<R>>,
    load_more: Option<LoadMoreFn>,
    hovered_row: Option<usize>,
    header_bg: Color,
    row_bg: Color,
    row_alt_bg: Color,
    hover_bg: Color,
    border_color: Color,
    resizer_color: Color,
    text_color: Color,
    header_text_color: Color,
    accessible_name_value: Option<String>,
    test_id_value: Option<String>,
    bounds: Rect,
}

impl<R> fmt::Debug for VirtualizedTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualizedTable")
            .field("columns", &self.columns)
            .field("rows", &self.order.len())
            .field("loading", &self.loading)
            .field("sort", &self.sort)
            .field("scroll_offset", &self.rows.scroll_offset())
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl<R> VirtualizedTable<R> {
    /// Create an empty table with default options.
    #[must_use]
    pub fn new(columns: ColumnSet<R>) -> Self {
        Self::with_options(columns, TableOptions::default())
    }

    #[must_use]
    pub fn with_options(columns: ColumnSet<R>, options: TableOptions) -> Self {
        Self {
            columns,
            data: None,
            order: Vec::new(),
            loading: false,
            sort: SortState::default(),
            sizing: ColumnSizing::new(),
            rows: VirtualRows::new(options.rows),
            trigger: LoadMoreTrigger::new(options.load_more_threshold),
            header_height: options.header_height.max(0.0),
            on_row_clicked: None,
            load_more: None,
            hovered_row: None,
            header_bg: Color::new(0.95, 0.95, 0.95, 1.0),
            row_bg: Color::WHITE,
            row_alt_bg: Color::new(0.98, 0.98, 0.98, 1.0),
            hover_bg: Color::new(0.9, 0.95, 1.0, 1.0),
            border_color: Color::new(0.85, 0.85, 0.85, 1.0),
            resizer_color: Color::BLUE,
            text_color: Color::BLACK,
            header_text_color: Color::new(0.2, 0.2, 0.2, 1.0),
            accessible_name_value: None,
            test_id_value: None,
            bounds: Rect::default(),
        }
    }

    /// Set the row data.
    #[must_use]
    pub fn data(mut self, data: Option<Arc<[R]>>) -> Self {
        self.set_data(data);
        self
    }

    /// Set the loading flag.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Call `f` with the record of a clicked row. Makes rows clickable.
    #[must_use]
    pub fn on_row_clicked(mut self, f: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.on_row_clicked = Some(Arc::new(f));
        self
    }

    /// Call `f` when the viewport nears the bottom while not loading.
    #[must_use]
    pub fn load_more(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.load_more = Some(Arc::new(f));
        self
    }

    /// Set the initial sort state.
    #[must_use]
    pub fn sort(mut self, sort: SortState) -> Self {
        self.set_sort(sort);
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Replace the row data. `None` is treated as no rows.
    pub fn set_data(&mut self, data: Option<Arc<[R]>>) {
        if let (Some(old), Some(new)) = (&self.data, &data) {
            if Arc::ptr_eq(old, new) {
                return;
            }
        }
        self.data = data;
        self.refresh_order();
        self.rows.reset_measurements();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_on_row_clicked(&mut self, f: Option<RowClickFn<R>>) {
        self.on_row_clicked = f;
        if self.on_row_clicked.is_none() {
            self.hovered_row = None;
        }
    }

    pub fn set_load_more(&mut self, f: Option<LoadMoreFn>) {
        self.load_more = f;
    }

    /// Replace the sort state and reorder rows.
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.reorder();
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn columns(&self) -> &ColumnSet<R> {
        &self.columns
    }

    #[must_use]
    pub const fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// The row data in data order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        self.data.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.order.len()
    }

    /// Sorted order as indices into [`Self::records`].
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Records in display order.
    pub fn sorted_records(&self) -> impl Iterator<Item = &R> {
        let data = self.records();
        self.order.iter().filter_map(move |&i| data.get(i))
    }

    /// Record at a position of the sorted order.
    #[must_use]
    pub fn record_at(&self, position: usize) -> Option<&R> {
        self.order.get(position).and_then(|&i| self.records().get(i))
    }

    /// Toggle sorting on `key`.
    ///
    /// Returns the new direction, or `None` for unknown or non-sortable
    /// columns (which leave the state untouched).
    pub fn toggle_sort(&mut self, key: &str) -> Option<SortDirection> {
        if !self.columns.get(key).is_some_and(|c| c.is_sortable()) {
            return None;
        }
        let direction = self.sort.toggle(key);
        debug!(column = key, ?direction, "table sort changed");
        self.reorder();
        Some(direction)
    }

    /// Current width of a column.
    #[must_use]
    pub fn column_width(&self, key: &str) -> Option<f32> {
        self.sizing.width(&self.columns, key)
    }

    /// Current widths of all columns in order.
    #[must_use]
    pub fn column_widths(&self) -> Vec<f32> {
        self.sizing.widths(&self.columns)
    }

    /// Start resizing `key` with the pointer at `x`.
    pub fn begin_resize(&mut self, key: &str, x: f32) -> bool {
        let started = self.sizing.begin(&self.columns, key, x);
        if started {
            debug!(column = key, x, "column resize started");
        }
        started
    }

    /// Move the active resize to `x`, returning the new width.
    pub fn drag_resize(&mut self, x: f32) -> Option<f32> {
        self.sizing.drag(x).map(|(_, width)| width)
    }

    /// Finish the active resize.
    pub fn end_resize(&mut self) -> Option<String> {
        let column = self.sizing.end()?;
        debug!(
            column = %column,
            width = self.column_width(&column),
            "column resize finished"
        );
        Some(column)
    }

    /// Set the body viewport height directly (without a layout pass).
    pub fn set_viewport_height(&mut self, height: f32) {
        self.rows.set_viewport_height(height.max(0.0));
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f32 {
        self.rows.scroll_offset()
    }

    /// Scroll to `offset` and run the load-more check.
    pub fn scroll_to(&mut self, offset: f32) -> bool {
        self.rows.set_scroll_offset(offset);
        self.handle_scroll()
    }

    /// Scroll by `delta` and run the load-more check.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        self.rows.scroll_by(delta);
        self.handle_scroll()
    }

    /// Record the rendered height of the row at a sorted position.
    pub fn measure_row(&mut self, position: usize, height: f32) {
        self.rows.measure_row(position, height);
    }

    /// Scroll metrics of the whole table (header included).
    #[must_use]
    pub fn viewport_metrics(&self) -> ViewportMetrics {
        ViewportMetrics::new(
            self.rows.scroll_offset(),
            self.header_height + self.rows.total_size(),
            self.header_height + self.rows.viewport_height(),
        )
    }

    /// Run the load-more check against the table's own metrics. Call on
    /// every scroll.
    pub fn handle_scroll(&self) -> bool {
        self.check_load_more(self)
    }

    /// Run the load-more check once after the first render, so a first page
    /// shorter than the viewport still asks for more.
    pub fn after_mount(&self) -> bool {
        self.check_load_more(self)
    }

    /// Run the load-more check against an arbitrary probe.
    pub fn check_load_more(&self, probe: &dyn ViewportProbe) -> bool {
        let Some(load_more) = &self.load_more else {
            return false;
        };
        if !self.trigger.should_load(probe, self.loading) {
            return false;
        }
        debug!(
            distance = probe.metrics().distance_to_bottom(),
            threshold = self.trigger.threshold(),
            "requesting more rows"
        );
        load_more();
        true
    }

    /// Visible window over the sorted rows.
    #[must_use]
    pub fn window(&self) -> VirtualWindow {
        self.rows.window()
    }

    /// Snapshot of what the table shows at the current scroll position.
    #[must_use]
    pub fn view(&self) -> TableView {
        let widths = self.column_widths();
        let header = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, &width)| HeaderCell {
                key: column.key().to_string(),
                label: column.header().to_string(),
                width,
                sortable: column.is_sortable(),
                sort: column
                    .is_sortable()
                    .then(|| self.sort.direction_of(column.key()))
                    .flatten(),
                resizable: column.is_resizable(),
                resizing: self.sizing.resizing() == Some(column.key()),
            })
            .collect();

        let window = self.rows.window();
        let clickable = self.on_row_clicked.is_some();
        let mut rows = Vec::with_capacity(window.len() + 2);
        if window.padding_top > 0.0 {
            rows.push(BodyRow::Spacer {
                height: window.padding_top,
            });
        }
        for item in &window.items {
            let Some(&index) = self.order.get(item.index) else {
                continue;
            };
            let Some(record) = self.records().get(index) else {
                continue;
            };
            let cells = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, &width)| RenderedCell {
                    column: column.key().to_string(),
                    width,
                    content: column.render(record),
                })
                .collect();
            rows.push(BodyRow::Data {
                position: item.index,
                index,
                start: item.start,
                height: item.size,
                cells,
                clickable,
            });
        }
        if window.padding_bottom > 0.0 {
            rows.push(BodyRow::Spacer {
                height: window.padding_bottom,
            });
        }

        let status = if self.loading {
            Some(TableStatus::Fetching)
        } else if window.is_empty() {
            Some(TableStatus::NoData)
        } else {
            None
        };

        trace!(
            first = window.first_index(),
            last = window.last_index(),
            padding_top = window.padding_top,
            padding_bottom = window.padding_bottom,
            "table view rendered"
        );

        TableView {
            header,
            rows,
            status,
        }
    }

    /// Resolve what lies under `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> TableHit {
        if !self.bounds.contains_point(&point) {
            return TableHit::None;
        }
        let local_y = point.y - self.bounds.y;
        if local_y < self.header_height {
            let mut x = self.bounds.x;
            for (column, width) in self.columns.iter().zip(self.column_widths()) {
                let right = x + width;
                if point.x < right {
                    return TableHit::Header {
                        column: column.key().to_string(),
                        handle: column.is_resizable() && point.x >= right - RESIZE_HANDLE_WIDTH,
                    };
                }
                x = right;
            }
            return TableHit::None;
        }
        let offset = local_y - self.header_height + self.rows.scroll_offset();
        self.rows
            .row_at_offset(offset)
            .map_or(TableHit::None, TableHit::Row)
    }

    /// Invoke the row-click callback for a sorted position.
    ///
    /// Returns the data index of the clicked record.
    pub fn click_row(&self, position: usize) -> Option<usize> {
        let callback = self.on_row_clicked.as_ref()?;
        let index = *self.order.get(position)?;
        let record = self.records().get(index)?;
        debug!(position, index, "row clicked");
        callback(record);
        Some(index)
    }

    /// Re-sort after a sort change. Measurements and hover are keyed by
    /// sorted position, so neither survives.
    fn reorder(&mut self) {
        self.hovered_row = None;
        self.refresh_order();
        self.rows.reset_measurements();
    }

    fn refresh_order(&mut self) {
        let data = self.data.as_deref().unwrap_or(&[]);
        self.order = sorted_order(data, &self.columns, &self.sort);
        self.rows.set_row_count(self.order.len());
        if self.hovered_row.is_some_and(|p| p >= self.order.len()) {
            self.hovered_row = None;
        }
        trace!(rows = self.order.len(), "table order recomputed");
    }

    fn body_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y + self.header_height,
            self.bounds.width,
            (self.bounds.height - self.header_height).max(0.0),
        )
    }

    fn paint_cell(&self, canvas: &mut dyn Canvas, content: &CellContent, rect: Rect) {
        let text_style = TextStyle {
            size: 13.0,
            color: self.text_color,
            ..TextStyle::default()
        };
        let baseline = Point::new(rect.x + 8.0, rect.y + rect.height / 2.0);
        match content {
            CellContent::Text(text) => canvas.draw_text(text, baseline, &text_style),
            CellContent::Badge { label, color } => {
                let pill_width = (label.chars().count() as f32).mul_add(7.0, 12.0);
                let pill = Rect::new(
                    rect.x + 4.0,
                    rect.y + 4.0,
                    pill_width.min((rect.width - 8.0).max(0.0)),
                    (rect.height - 8.0).max(0.0),
                );
                canvas.fill_rect(pill, color.with_alpha(0.15));
                let style = TextStyle {
                    size: 12.0,
                    color: *color,
                    weight: FontWeight::Semibold,
                };
                canvas.draw_text(label, baseline, &style);
            }
            CellContent::Preview { .. } => {
                canvas.draw_text(&content.display(), baseline, &text_style);
            }
            CellContent::Empty => {}
        }
    }
}

impl<R> ViewportProbe for VirtualizedTable<R> {
    fn metrics(&self) -> ViewportMetrics {
        self.viewport_metrics()
    }
}

impl<R: Send + Sync + 'static> Widget for VirtualizedTable<R> {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width: f32 = self.column_widths().iter().sum();
        let preferred = Size::new(width, self.header_height + self.rows.total_size() + STATUS_HEIGHT);
        constraints.constrain(preferred)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.rows
            .set_viewport_height((bounds.height - self.header_height).max(0.0));
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let view = self.view();

        // Header
        let header_rect = Rect::new(
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.header_height,
        );
        canvas.fill_rect(header_rect, self.header_bg);
        let header_style = TextStyle {
            size: 13.0,
            color: self.header_text_color,
            weight: FontWeight::Bold,
        };
        let mut x = self.bounds.x;
        for cell in &view.header {
            let label = match cell.sort {
                Some(direction) => format!("{} {}", cell.label, direction.indicator()),
                None => cell.label.clone(),
            };
            canvas.draw_text(
                &label,
                Point::new(x + 8.0, self.bounds.y + self.header_height / 2.0),
                &header_style,
            );
            if cell.resizable {
                let handle = Rect::new(
                    x + cell.width - RESIZE_HANDLE_WIDTH,
                    self.bounds.y,
                    RESIZE_HANDLE_WIDTH,
                    self.header_height,
                );
                let color = if cell.resizing {
                    self.resizer_color
                } else {
                    self.border_color
                };
                canvas.fill_rect(handle, color);
            }
            x += cell.width;
        }

        // Body; spacers only shift positions
        let body = self.body_rect();
        canvas.push_clip(body);
        let top = body.y - self.rows.scroll_offset();
        for row in &view.rows {
            let BodyRow::Data {
                position,
                start,
                height,
                cells,
                ..
            } = row
            else {
                continue;
            };
            let y = top + start;
            let bg = if self.hovered_row == Some(*position) {
                self.hover_bg
            } else if position % 2 == 1 {
                self.row_alt_bg
            } else {
                self.row_bg
            };
            canvas.fill_rect(Rect::new(self.bounds.x, y, self.bounds.width, *height), bg);
            let mut x = self.bounds.x;
            for cell in cells {
                self.paint_cell(canvas, &cell.content, Rect::new(x, y, cell.width, *height));
                x += cell.width;
            }
        }
        if let Some(status) = view.status {
            let style = TextStyle {
                size: 13.0,
                color: Color::DIMMED,
                ..TextStyle::default()
            };
            let y = top + self.rows.total_size() + STATUS_HEIGHT / 2.0;
            canvas.draw_text(
                status.label(),
                Point::new(self.bounds.x + self.bounds.width / 2.0, y),
                &style,
            );
        }
        canvas.pop_clip();

        canvas.stroke_rect(self.bounds, self.border_color, 1.0);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => match self.hit_test(*position) {
                TableHit::Header {
                    column,
                    handle: true,
                } => {
                    self.begin_resize(&column, position.x);
                    None
                }
                TableHit::Header {
                    column,
                    handle: false,
                } => {
                    let direction = self.toggle_sort(&column)?;
                    Some(Box::new(TableSortChanged { column, direction }))
                }
                TableHit::Row(position) => {
                    let index = self.click_row(position)?;
                    Some(Box::new(TableRowClicked { position, index }))
                }
                TableHit::None => None,
            },
            Event::MouseMove { position } => {
                if self.sizing.is_resizing() {
                    let (column, width) = self.sizing.drag(position.x)?;
                    return Some(Box::new(ColumnResized { column, width }));
                }
                self.hovered_row = match self.hit_test(*position) {
                    TableHit::Row(p) if self.on_row_clicked.is_some() => Some(p),
                    _ => None,
                };
                None
            }
            Event::MouseUp { .. } => {
                self.end_resize();
                None
            }
            Event::Scroll { delta_y, .. } => {
                self.rows.scroll_by(*delta_y);
                let load_more_requested = self.handle_scroll();
                Some(Box::new(TableScrolled {
                    offset: self.rows.scroll_offset(),
                    load_more_requested,
                }))
            }
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn cursor(&self, position: Point) -> CursorStyle {
        if self.sizing.is_resizing() {
            return CursorStyle::ColResize;
        }
        match self.hit_test(position) {
            TableHit::Header { handle: true, .. } => CursorStyle::ColResize,
            TableHit::Header { column, .. }
                if self.columns.get(&column).is_some_and(|c| c.is_sortable()) =>
            {
                CursorStyle::Pointer
            }
            TableHit::Row(_) if self.on_row_clicked.is_some() => CursorStyle::Pointer,
            _ => CursorStyle::Default,
        }
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Table
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use genscope_core::RecordingCanvas;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    struct Rec {
        id: u32,
        created_at: f64,
        name: String,
        note: &'static str,
    }

    fn columns() -> ColumnSet<Rec> {
        ColumnSet::new(vec![
            ColumnDef::accessor("created_at", "Time", |r: &Rec| CellValue::Number(r.created_at))
                .size(60.0)
                .resizable(false),
            ColumnDef::accessor("name", "Name", |r: &Rec| CellValue::from(r.name.clone()))
                .size(80.0),
            ColumnDef::accessor("note", "Note", |r: &Rec| CellValue::from(r.note))
                .size(200.0)
                .sortable(false),
        ])
        .unwrap()
    }

    fn records(n: u32) -> Arc<[Rec]> {
        (0..n)
            .map(|id| Rec {
                id,
                created_at: f64::from(id),
                name: format!("r{id:03}"),
                note: "x",
            })
            .collect()
    }

    /// Table with `n` rows laid out with a 300px body.
    fn table(n: u32) -> VirtualizedTable<Rec> {
        let mut table = VirtualizedTable::new(columns()).data(Some(records(n)));
        table.layout(Rect::new(0.0, 0.0, 340.0, 336.0));
        table
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn left_down(x: f32, y: f32) -> Event {
        Event::MouseDown {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    // ===== Data Tests =====

    #[test]
    fn test_no_data_is_empty() {
        let mut table: VirtualizedTable<Rec> = VirtualizedTable::new(columns());
        table.layout(Rect::new(0.0, 0.0, 340.0, 336.0));
        let view = table.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.status, Some(TableStatus::NoData));
        assert_eq!(view.header.len(), 3);
    }

    #[test]
    fn test_default_sort_created_at_desc() {
        let table = table(5);
        let ids: Vec<u32> = table.sorted_records().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1, 0]);
        assert_eq!(table.order(), &[4, 3, 2, 1, 0]);
        assert_eq!(table.record_at(0).map(|r| r.id), Some(4));
    }

    #[test]
    fn test_set_same_data_is_noop() {
        let data = records(3);
        let mut table = VirtualizedTable::new(columns()).data(Some(Arc::clone(&data)));
        table.set_data(Some(data));
        assert_eq!(table.row_count(), 3);
        table.set_data(None);
        assert_eq!(table.row_count(), 0);
    }

    // ===== Virtualization Tests =====

    #[test]
    fn test_first_window_and_bottom_spacer() {
        let view = table(1000).view();
        assert_eq!(view.data_row_count(), 10);
        assert!(!view.rows[0].is_spacer());
        assert_eq!(view.rows.last(), Some(&BodyRow::Spacer { height: 29_700.0 }));
        match &view.rows[0] {
            BodyRow::Data {
                position, index, ..
            } => {
                assert_eq!(*position, 0);
                assert_eq!(*index, 999);
            }
            BodyRow::Spacer { .. } => panic!("expected data row"),
        }
        assert_eq!(view.status, None);
    }

    #[test]
    fn test_scrolled_window_has_both_spacers() {
        let mut table = table(1000);
        assert!(!table.scroll_to(3000.0));
        let view = table.view();
        assert_eq!(view.rows.first(), Some(&BodyRow::Spacer { height: 3000.0 }));
        assert_eq!(view.rows.last(), Some(&BodyRow::Spacer { height: 26_700.0 }));
        assert_eq!(view.data_row_count(), 10);
        assert_eq!(view.body_height(), 30_000.0);
        let window = table.window();
        assert_eq!(window.first_index(), Some(100));
        assert_eq!(window.last_index(), Some(109));
    }

    #[test]
    fn test_longer_data_keeps_scroll() {
        let mut table = table(100);
        table.scroll_to(600.0);
        table.set_data(Some(records(200)));
        assert_eq!(table.scroll_offset(), 600.0);
        assert_eq!(table.row_count(), 200);
    }

    #[test]
    fn test_measured_row_changes_total() {
        let mut table = table(10);
        table.measure_row(0, 60.0);
        assert_eq!(table.viewport_metrics().scroll_height, 36.0 + 330.0);
    }

    #[test]
    fn test_new_data_drops_measurements() {
        let mut table = table(10);
        table.measure_row(0, 60.0);
        table.set_data(Some(records(20)));
        assert_eq!(table.viewport_metrics().scroll_height, 36.0 + 600.0);
    }

    // ===== Sort Tests =====

    #[test]
    fn test_toggle_sort_cycle() {
        let mut table = table(3);
        assert_eq!(table.toggle_sort("name"), Some(SortDirection::Ascending));
        assert_eq!(table.record_at(0).map(|r| r.id), Some(0));
        assert_eq!(table.toggle_sort("name"), Some(SortDirection::Descending));
        assert_eq!(table.record_at(0).map(|r| r.id), Some(2));
        assert_eq!(table.toggle_sort("name"), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_toggle_unsortable_is_noop() {
        let mut table = table(3);
        assert_eq!(table.toggle_sort("note"), None);
        assert_eq!(table.toggle_sort("missing"), None);
        assert_eq!(table.sort_state(), &SortState::default());
    }

    #[test]
    fn test_sort_clears_hover_and_measurements() {
        let mut table = table(10).on_row_clicked(|_: &Rec| {});
        table.measure_row(1, 90.0);
        table.event(&Event::MouseMove {
            position: Point::new(10.0, 36.0 + 45.0),
        });
        assert_eq!(table.hovered_row, Some(1));

        table.toggle_sort("name");
        assert_eq!(table.hovered_row, None);
        assert_eq!(table.viewport_metrics().scroll_height, 36.0 + 300.0);
    }

    #[test]
    fn test_header_indicators() {
        let view = table(3).view();
        assert_eq!(view.header[0].sort, Some(SortDirection::Descending));
        assert_eq!(view.header[1].sort, None);
        assert!(!view.header[2].sortable);
        assert!(!view.header[0].resizable);
        assert!(view.header[1].resizable);
    }

    // ===== Resize Tests =====

    #[test]
    fn test_resize_updates_only_that_column() {
        let mut table = table(3);
        let order_before = table.order().to_vec();
        assert!(table.begin_resize("name", 140.0));
        assert_eq!(table.drag_resize(160.0), Some(100.0));
        assert!(table.view().header[1].resizing);
        assert_eq!(table.end_resize(), Some("name".to_string()));
        assert_eq!(table.column_widths(), vec![60.0, 100.0, 200.0]);
        assert_eq!(table.order(), order_before.as_slice());
    }

    #[test]
    fn test_resize_refused_for_fixed_column() {
        let mut table = table(3);
        assert!(!table.begin_resize("created_at", 55.0));
        assert_eq!(table.drag_resize(100.0), None);
        assert_eq!(table.column_width("created_at"), Some(60.0));
    }

    // ===== Load More Tests =====

    #[test]
    fn test_after_mount_short_page_requests_more() {
        let (count, load_more) = counter();
        let mut table = table(10).load_more(load_more);
        assert!(table.after_mount());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        table.set_loading(true);
        assert!(!table.after_mount());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scroll_near_bottom_requests_more() {
        let (count, load_more) = counter();
        let mut table = table(1000).load_more(load_more);
        assert!(!table.after_mount());
        // 30036 - 29000 - 336 = 700
        assert!(!table.scroll_to(29_000.0));
        // 30036 - 29200 - 336 = 500
        assert!(table.scroll_to(29_200.0));
        assert!(table.scroll_by(10.0));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_callback_never_requests() {
        let table = table(1);
        assert!(!table.handle_scroll());
        assert!(!table.after_mount());
    }

    #[test]
    fn test_custom_probe() {
        let (count, load_more) = counter();
        let table = table(1000).load_more(load_more);
        let near = || ViewportMetrics::new(0.0, 1000.0, 500.0);
        let far = ViewportMetrics::new(0.0, 5000.0, 500.0);
        assert!(table.check_load_more(&near));
        assert!(!table.check_load_more(&far));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    // ===== Status Tests =====

    #[test]
    fn test_status_fetching_and_no_data() {
        let mut table = table(5);
        table.set_loading(true);
        assert_eq!(table.view().status, Some(TableStatus::Fetching));
        table.set_loading(false);
        assert_eq!(table.view().status, None);
        table.set_data(Some(records(0)));
        assert_eq!(table.view().status, Some(TableStatus::NoData));
        table.set_loading(true);
        assert_eq!(table.view().status, Some(TableStatus::Fetching));
    }

    // ===== Event Tests =====

    #[test]
    fn test_row_click_event() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicked);
        let mut table = table(10).on_row_clicked(move |r: &Rec| sink.lock().unwrap().push(r.id));

        let msg = table.event(&left_down(10.0, 36.0 + 45.0)).unwrap();
        let clicked_msg = msg.downcast_ref::<TableRowClicked>().unwrap();
        assert_eq!(clicked_msg.position, 1);
        assert_eq!(clicked_msg.index, 8);
        assert_eq!(*clicked.lock().unwrap(), vec![8]);
    }

    #[test]
    fn test_row_click_without_callback() {
        let mut table = table(10);
        assert!(table.event(&left_down(10.0, 50.0)).is_none());
        assert!(table.view().data_rows().all(|r| matches!(
            r,
            BodyRow::Data {
                clickable: false,
                ..
            }
        )));
    }

    #[test]
    fn test_header_click_sorts() {
        let clicked = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&clicked);
        let mut table = table(10).on_row_clicked(move |_: &Rec| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let msg = table.event(&left_down(70.0, 10.0)).unwrap();
        let sort = msg.downcast_ref::<TableSortChanged>().unwrap();
        assert_eq!(sort.column, "name");
        assert_eq!(sort.direction, SortDirection::Ascending);
        assert_eq!(clicked.load(Ordering::SeqCst), 0);

        // Non-sortable header
        assert!(table.event(&left_down(200.0, 10.0)).is_none());
    }

    #[test]
    fn test_handle_drag_resizes() {
        let mut table = table(10);
        // Name column spans 60..140, handle 135..140
        assert!(table.event(&left_down(137.0, 10.0)).is_none());
        assert_eq!(table.sort_state(), &SortState::default());

        let msg = table
            .event(&Event::MouseMove {
                position: Point::new(157.0, 10.0),
            })
            .unwrap();
        let resized = msg.downcast_ref::<ColumnResized>().unwrap();
        assert_eq!(resized.column, "name");
        assert_eq!(resized.width, 100.0);

        table.event(&Event::MouseUp {
            position: Point::new(157.0, 10.0),
            button: MouseButton::Left,
        });
        assert!(table
            .event(&Event::MouseMove {
                position: Point::new(200.0, 10.0),
            })
            .is_none());
        assert_eq!(table.column_width("name"), Some(100.0));
    }

    #[test]
    fn test_scroll_event() {
        let mut table = table(100);
        let msg = table
            .event(&Event::Scroll {
                delta_x: 0.0,
                delta_y: 90.0,
            })
            .unwrap();
        let scrolled = msg.downcast_ref::<TableScrolled>().unwrap();
        assert_eq!(scrolled.offset, 90.0);
        assert!(!scrolled.load_more_requested);
        assert_eq!(table.window().first_index(), Some(3));

        table.event(&Event::Scroll {
            delta_x: 0.0,
            delta_y: -500.0,
        });
        assert_eq!(table.scroll_offset(), 0.0);
    }

    #[test]
    fn test_cursor() {
        let plain = table(10);
        assert_eq!(plain.cursor(Point::new(137.0, 10.0)), CursorStyle::ColResize);
        assert_eq!(plain.cursor(Point::new(70.0, 10.0)), CursorStyle::Pointer);
        assert_eq!(plain.cursor(Point::new(200.0, 10.0)), CursorStyle::Default);
        assert_eq!(plain.cursor(Point::new(10.0, 50.0)), CursorStyle::Default);

        let clickable = table(10).on_row_clicked(|_: &Rec| {});
        assert_eq!(clickable.cursor(Point::new(10.0, 50.0)), CursorStyle::Pointer);
    }

    // ===== Widget Tests =====

    #[test]
    fn test_measure() {
        let table = table(10);
        let size = table.measure(Constraints::loose(Size::new(1000.0, 1000.0)));
        assert_eq!(size.width, 340.0);
        assert_eq!(size.height, 36.0 + 300.0 + STATUS_HEIGHT);
    }

    #[test]
    fn test_paint_records_header_and_rows() {
        let mut table = table(3);
        table.set_loading(true);
        let mut canvas = RecordingCanvas::new();
        table.paint(&mut canvas);
        let texts = canvas.texts();
        assert!(texts.contains(&"Time ▼"));
        assert!(texts.contains(&"Name"));
        assert!(texts.contains(&"r002"));
        assert!(texts.contains(&"Fetching..."));
        assert_eq!(canvas.clip_depth(), 0);
    }

    #[test]
    fn test_accessibility() {
        let table = VirtualizedTable::new(columns())
            .accessible_name("Generations")
            .with_test_id("generations-table");
        assert_eq!(Widget::accessible_name(&table), Some("Generations"));
        assert_eq!(Widget::test_id(&table), Some("generations-table"));
        assert_eq!(table.accessible_role(), AccessibleRole::Table);
    }

    proptest! {
        #[test]
        fn prop_view_heights_sum_to_total(n in 0u32..500, height in 40.0f32..800.0, scroll in 0.0f32..20_000.0) {
            let mut table = VirtualizedTable::new(columns()).data(Some(records(n)));
            table.layout(Rect::new(0.0, 0.0, 340.0, height));
            table.scroll_to(scroll);
            let view = table.view();
            let total = n as f32 * 30.0;
            prop_assert!((view.body_height() - total).abs() < 0.5);

            let positions: Vec<usize> = view
                .data_rows()
                .filter_map(|r| match r {
                    BodyRow::Data { position, .. } => Some(*position),
                    BodyRow::Spacer { .. } => None,
                })
                .collect();
            for pair in positions.windows(2) {
                prop_assert_eq!(pair[1], pair[0] + 1);
            }
        }
    }
}
