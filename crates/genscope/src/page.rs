//! The generations page: feed, filters, table and detail drawer together.

use crate::columns::generation_columns;
use crate::config::DashboardConfig;
use crate::drawer::DetailDrawer;
use crate::error::DashboardError;
use crate::feed::{GenerationFeed, GenerationSource};
use crate::filter::{FilterOptions, GenerationFilter};
use crate::generation::Generation;
use genscope_core::{Event, Rect, Widget};
use genscope_widgets::VirtualizedTable;
use std::any::Any;
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, debug_span, trace};

/// Work requested by table callbacks, handled after the event returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    LoadMore,
    OpenDetail(String),
}

/// Generations dashboard page over a source `S`.
pub struct GenerationsPage<S> {
    source: S,
    feed: GenerationFeed,
    table: VirtualizedTable<Generation>,
    drawer: DetailDrawer,
    actions: Receiver<PageAction>,
}

impl<S: GenerationSource> GenerationsPage<S> {
    pub fn new(source: S, config: &DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let (tx, actions) = mpsc::channel();
        let click_tx = tx.clone();
        let table = VirtualizedTable::with_options(generation_columns()?, config.table.options())
            .sort(config.table.sort_state())
            .accessible_name("Generations")
            .with_test_id("generations-table")
            .on_row_clicked(move |g: &Generation| {
                if click_tx.send(PageAction::OpenDetail(g.id.clone())).is_err() {
                    trace!("page dropped before row click");
                }
            })
            .load_more(move || {
                if tx.send(PageAction::LoadMore).is_err() {
                    trace!("page dropped before load more");
                }
            });

        Ok(Self {
            source,
            feed: GenerationFeed::new(config.feed.page_size),
            table,
            drawer: DetailDrawer::new(),
            actions,
        })
    }

    /// Fetch the first page, then run the post-mount load check.
    pub fn mount(&mut self) -> Result<(), DashboardError> {
        let _span = debug_span!("mount").entered();
        self.load_more()?;
        self.table.after_mount();
        self.process_actions()
    }

    /// Lay the table out in `bounds`.
    pub fn layout(&mut self, bounds: Rect) {
        self.table.layout(bounds);
    }

    /// Route an input event to the table and handle the resulting actions.
    pub fn handle_event(
        &mut self,
        event: &Event,
    ) -> Result<Option<Box<dyn Any + Send>>, DashboardError> {
        let message = self.table.event(event);
        self.process_actions()?;
        Ok(message)
    }

    /// Scroll the table body to `offset` and handle the resulting actions.
    pub fn scroll_to(&mut self, offset: f32) -> Result<(), DashboardError> {
        self.table.scroll_to(offset);
        self.process_actions()
    }

    /// Apply a new filter: drop loaded pages and fetch from the top.
    pub fn set_filter(&mut self, filter: GenerationFilter) -> Result<(), DashboardError> {
        debug!(?filter, "page filter changed");
        self.feed.set_filter(filter);
        self.load_more()?;
        self.table.scroll_to(0.0);
        self.process_actions()
    }

    /// Handle queued actions until none are left.
    ///
    /// Repeated `LoadMore` requests queued by one event collapse into a
    /// single fetch. A loaded page re-runs the load check, so a viewport that
    /// is still near the bottom keeps fetching until the feed runs out.
    pub fn process_actions(&mut self) -> Result<(), DashboardError> {
        loop {
            let mut load_requested = false;
            while let Ok(action) = self.actions.try_recv() {
                match action {
                    PageAction::LoadMore => load_requested = true,
                    PageAction::OpenDetail(id) => self.open_detail(&id),
                }
            }
            if !load_requested || !self.load_more()? {
                return Ok(());
            }
            self.table.handle_scroll();
        }
    }

    fn open_detail(&mut self, id: &str) {
        match self.feed.find(id) {
            Some(generation) => {
                debug!(id, "opening generation detail");
                self.drawer.open(generation);
            }
            None => trace!(id, "clicked generation no longer loaded"),
        }
    }

    /// Fetch one page through the feed. Returns false when nothing was
    /// requested (in flight or exhausted).
    fn load_more(&mut self) -> Result<bool, DashboardError> {
        let Some(request) = self.feed.request_more() else {
            return Ok(false);
        };
        self.table.set_loading(true);
        let page = self.source.fetch(&request);
        let outcome = self.feed.complete(page);
        self.sync_table();
        outcome.map(|count| count > 0)
    }

    fn sync_table(&mut self) {
        self.table.set_data(Some(self.feed.data()));
        self.table.set_loading(self.feed.is_loading());
    }

    #[must_use]
    pub const fn table(&self) -> &VirtualizedTable<Generation> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut VirtualizedTable<Generation> {
        &mut self.table
    }

    #[must_use]
    pub const fn feed(&self) -> &GenerationFeed {
        &self.feed
    }

    #[must_use]
    pub const fn drawer(&self) -> &DetailDrawer {
        &self.drawer
    }

    pub fn close_detail(&mut self) {
        self.drawer.close();
    }

    /// Distinct models, statuses, tags and users among loaded generations.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::collect(self.feed.records())
    }

    /// Text rendering of the table and, if open, the detail drawer.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = self.table.view().to_text();
        if let Some(detail) = self.drawer.detail() {
            out.push('\n');
            out.push_str(&detail.to_text());
        }
        out
    }
}
