//! Page-by-page loading of generations.

use crate::error::DashboardError;
use crate::filter::GenerationFilter;
use crate::generation::Generation;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Rows requested per page when no size is configured.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
    pub filter: GenerationFilter,
}

/// Backend that serves generations newest first.
pub trait GenerationSource {
    fn fetch(&self, request: &PageRequest) -> Result<Vec<Generation>, DashboardError>;
}

impl<S: GenerationSource + ?Sized> GenerationSource for &S {
    fn fetch(&self, request: &PageRequest) -> Result<Vec<Generation>, DashboardError> {
        (**self).fetch(request)
    }
}

/// In-memory source, e.g. loaded from a JSON export.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    generations: Vec<Generation>,
}

impl MemorySource {
    /// Source serving `generations`, kept newest first.
    #[must_use]
    pub fn new(mut generations: Vec<Generation>) -> Self {
        generations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { generations }
    }

    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        Ok(Self::new(Generation::list_from_json(json)?))
    }

    /// Load a JSON array of generations from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }
}

impl GenerationSource for MemorySource {
    fn fetch(&self, request: &PageRequest) -> Result<Vec<Generation>, DashboardError> {
        Ok(request
            .filter
            .apply(&self.generations)
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect())
    }
}

/// Accumulated pages plus the in-flight guard.
///
/// At most one request is outstanding: [`GenerationFeed::request_more`]
/// returns `None` while one is in flight or after a short page.
#[derive(Debug, Clone)]
pub struct GenerationFeed {
    page_size: usize,
    filter: GenerationFilter,
    records: Vec<Generation>,
    snapshot: Arc<[Generation]>,
    in_flight: Option<PageRequest>,
    exhausted: bool,
    last_error: Option<String>,
}

impl Default for GenerationFeed {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl GenerationFeed {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            filter: GenerationFilter::default(),
            records: Vec::new(),
            snapshot: Arc::from(Vec::new()),
            in_flight: None,
            exhausted: false,
            last_error: None,
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn filter(&self) -> &GenerationFilter {
        &self.filter
    }

    /// Start the next page request, unless one is in flight or the source
    /// has run out.
    pub fn request_more(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            trace!("page request already in flight");
            return None;
        }
        if self.exhausted {
            trace!("feed exhausted");
            return None;
        }
        let request = PageRequest {
            offset: self.records.len(),
            limit: self.page_size,
            filter: self.filter.clone(),
        };
        debug!(offset = request.offset, limit = request.limit, "requesting page");
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Finish the in-flight request with its result.
    ///
    /// Returns the number of appended generations.
    pub fn complete(
        &mut self,
        page: Result<Vec<Generation>, DashboardError>,
    ) -> Result<usize, DashboardError> {
        let Some(request) = self.in_flight.take() else {
            warn!("page completed without a request in flight");
            return Ok(0);
        };
        match page {
            Ok(page) => {
                let count = page.len();
                if count < request.limit {
                    self.exhausted = true;
                }
                self.records.extend(page);
                self.snapshot = Arc::from(self.records.as_slice());
                self.last_error = None;
                debug!(
                    offset = request.offset,
                    count,
                    total = self.records.len(),
                    exhausted = self.exhausted,
                    "page loaded"
                );
                Ok(count)
            }
            Err(e) => {
                warn!(offset = request.offset, error = %e, "page failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Request and synchronously fetch the next page from `source`.
    pub fn fetch_next<S: GenerationSource>(&mut self, source: &S) -> Result<usize, DashboardError> {
        match self.request_more() {
            Some(request) => {
                let page = source.fetch(&request);
                self.complete(page)
            }
            None => Ok(0),
        }
    }

    /// Switch filters, dropping every loaded page.
    pub fn set_filter(&mut self, filter: GenerationFilter) {
        debug!(?filter, "feed filter changed");
        self.filter = filter;
        self.reset();
    }

    /// Drop all loaded pages.
    pub fn reset(&mut self) {
        self.records.clear();
        self.snapshot = Arc::from(Vec::new());
        self.in_flight = None;
        self.exhausted = false;
        self.last_error = None;
    }

    /// Shared snapshot of the loaded generations.
    #[must_use]
    pub fn data(&self) -> Arc<[Generation]> {
        Arc::clone(&self.snapshot)
    }

    #[must_use]
    pub fn records(&self) -> &[Generation] {
        &self.records
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Generation> {
        self.records.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
