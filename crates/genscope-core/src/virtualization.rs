// Row virtualization - headless windowing over a scrollable list of rows
//
// Provides:
// - Visible window over fixed or measured row heights
// - Spacer paddings above and below the rendered window
// - Viewport probing for scroll metrics
// - Near-bottom "load more" check

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// Distance from the bottom, in pixels, under which more rows are requested.
pub const DEFAULT_LOAD_MORE_THRESHOLD: f32 = 600.0;

/// Configuration for row virtualization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualRowsConfig {
    /// Height used for rows that have not been measured
    pub estimated_row_height: f32,
    /// Rows rendered above/below the visible area
    pub overscan: usize,
}

impl Default for VirtualRowsConfig {
    fn default() -> Self {
        Self {
            estimated_row_height: 30.0,
            overscan: 0,
        }
    }
}

/// A row placed in the virtual content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualItem {
    /// Index into the (sorted) row sequence
    pub index: usize,
    /// Offset of the row's top edge from the content top
    pub start: f32,
    /// Row height
    pub size: f32,
}

impl VirtualItem {
    /// Offset of the row's bottom edge.
    pub fn end(&self) -> f32 {
        self.start + self.size
    }
}

/// The contiguous slice of rows to render plus the spacers around it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VirtualWindow {
    /// Rows to render, in order
    pub items: Vec<VirtualItem>,
    /// Height standing in for the rows above the window
    pub padding_top: f32,
    /// Height standing in for the rows below the window
    pub padding_bottom: f32,
    /// Height of the whole virtual content
    pub total_size: f32,
}

impl VirtualWindow {
    /// Index range covered by the window.
    pub fn range(&self) -> Range<usize> {
        match (self.items.first(), self.items.last()) {
            (Some(first), Some(last)) => first.index..last.index + 1,
            _ => 0..0,
        }
    }

    /// First rendered index.
    pub fn first_index(&self) -> Option<usize> {
        self.items.first().map(|item| item.index)
    }

    /// Last rendered index (inclusive).
    pub fn last_index(&self) -> Option<usize> {
        self.items.last().map(|item| item.index)
    }

    /// Number of rendered rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the rendered row heights.
    pub fn rendered_size(&self) -> f32 {
        self.items.iter().map(|item| item.size).sum()
    }
}

/// Virtualized row state
#[derive(Debug, Clone)]
pub struct VirtualRows {
    config: VirtualRowsConfig,
    /// Total number of rows
    row_count: usize,
    /// Heights reported by the renderer, keyed by row index
    measured: HashMap<usize, f32>,
    /// Prefix offsets; `offsets[i]` is the top of row `i`, `offsets[row_count]` the total
    offsets: Vec<f32>,
    /// Current scroll offset of the body
    scroll_offset: f32,
    /// Visible body height
    viewport_height: f32,
}

impl Default for VirtualRows {
    fn default() -> Self {
        Self::new(VirtualRowsConfig::default())
    }
}

impl VirtualRows {
    pub fn new(config: VirtualRowsConfig) -> Self {
        Self {
            config,
            row_count: 0,
            measured: HashMap::new(),
            offsets: vec![0.0],
            scroll_offset: 0.0,
            viewport_height: 0.0,
        }
    }

    pub fn config(&self) -> &VirtualRowsConfig {
        &self.config
    }

    /// Set total row count
    pub fn set_row_count(&mut self, count: usize) {
        if count != self.row_count {
            self.row_count = count;
            self.measured.retain(|&index, _| index < count);
            self.recalculate_offsets();
            self.clamp_scroll();
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Set visible body height
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
        self.clamp_scroll();
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Set scroll offset, clamped to `[0, max_scroll]`
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Scroll by delta
    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_offset(self.scroll_offset + delta);
    }

    /// Maximum scroll offset
    pub fn max_scroll(&self) -> f32 {
        (self.total_size() - self.viewport_height).max(0.0)
    }

    /// Height of the whole virtual content
    pub fn total_size(&self) -> f32 {
        self.offsets[self.row_count]
    }

    /// Record a rendered row's real height. Non-positive or non-finite
    /// heights are ignored.
    pub fn measure_row(&mut self, index: usize, height: f32) {
        if index >= self.row_count || !height.is_finite() || height <= 0.0 {
            return;
        }
        if self.row_height(index) == height {
            return;
        }
        self.measured.insert(index, height);
        self.recalculate_offsets();
        self.clamp_scroll();
    }

    /// Forget all measurements, e.g. after the row order changed
    pub fn reset_measurements(&mut self) {
        if !self.measured.is_empty() {
            self.measured.clear();
            self.recalculate_offsets();
            self.clamp_scroll();
        }
    }

    /// Height for a row (measured or estimated)
    pub fn row_height(&self, index: usize) -> f32 {
        self.measured
            .get(&index)
            .copied()
            .unwrap_or(self.config.estimated_row_height)
    }

    /// Top offset of a row
    pub fn row_start(&self, index: usize) -> f32 {
        self.offsets[index.min(self.row_count)]
    }

    /// Row at a content offset, if any
    pub fn row_at_offset(&self, offset: f32) -> Option<usize> {
        if offset < 0.0 || offset >= self.total_size() {
            return None;
        }
        // Number of rows whose bottom edge is at or above `offset`
        let index = self.offsets[1..=self.row_count].partition_point(|&end| end <= offset);
        (index < self.row_count).then_some(index)
    }

    /// Compute the window of rows intersecting `[scroll, scroll + viewport)`.
    pub fn window(&self) -> VirtualWindow {
        let total_size = self.total_size();
        if self.row_count == 0 || self.viewport_height <= 0.0 {
            return VirtualWindow {
                items: Vec::new(),
                padding_top: 0.0,
                padding_bottom: 0.0,
                total_size,
            };
        }

        let top = self.scroll_offset;
        let bottom = top + self.viewport_height;

        let start = self.offsets[1..=self.row_count].partition_point(|&end| end <= top);
        let end = self.offsets[..self.row_count].partition_point(|&begin| begin < bottom);

        let render_start = start.saturating_sub(self.config.overscan).min(end);
        let render_end = (end + self.config.overscan).min(self.row_count);

        let items = (render_start..render_end)
            .map(|index| VirtualItem {
                index,
                start: self.offsets[index],
                size: self.offsets[index + 1] - self.offsets[index],
            })
            .collect();

        VirtualWindow {
            items,
            padding_top: self.offsets[render_start],
            padding_bottom: total_size - self.offsets[render_end],
            total_size,
        }
    }

    /// Reset scroll position
    pub fn reset(&mut self) {
        self.scroll_offset = 0.0;
    }

    fn recalculate_offsets(&mut self) {
        self.offsets.clear();
        self.offsets.reserve(self.row_count + 1);

        let mut current = 0.0;
        self.offsets.push(current);
        for index in 0..self.row_count {
            current += self.row_height(index);
            self.offsets.push(current);
        }
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
    }
}

/// Scroll metrics of a scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportMetrics {
    /// Current scroll offset
    pub scroll_top: f32,
    /// Full scrollable height
    pub scroll_height: f32,
    /// Visible height
    pub client_height: f32,
}

impl ViewportMetrics {
    pub const fn new(scroll_top: f32, scroll_height: f32, client_height: f32) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Pixels left to scroll before the bottom is reached.
    pub fn distance_to_bottom(&self) -> f32 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// Source of scroll metrics, queried on demand.
pub trait ViewportProbe {
    fn metrics(&self) -> ViewportMetrics;
}

impl ViewportProbe for ViewportMetrics {
    fn metrics(&self) -> ViewportMetrics {
        *self
    }
}

impl<F> ViewportProbe for F
where
    F: Fn() -> ViewportMetrics,
{
    fn metrics(&self) -> ViewportMetrics {
        self()
    }
}

impl ViewportProbe for VirtualRows {
    fn metrics(&self) -> ViewportMetrics {
        ViewportMetrics::new(self.scroll_offset, self.total_size(), self.viewport_height)
    }
}

/// Level-triggered near-bottom check for infinite scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadMoreTrigger {
    threshold: f32,
}

impl Default for LoadMoreTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_MORE_THRESHOLD)
    }
}

impl LoadMoreTrigger {
    pub const fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// True when the probe is within the threshold of the bottom and no
    /// fetch is in progress.
    pub fn should_load(&self, probe: &dyn ViewportProbe, loading: bool) -> bool {
        !loading && probe.metrics().distance_to_bottom() < self.threshold
    }
}
