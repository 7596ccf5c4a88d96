//! genscope: a dashboard of LLM generations.
//!
//! The page shows generations in a [`VirtualizedTable`](widgets::VirtualizedTable)
//! that loads pages lazily as the user scrolls, sorts and resizes columns,
//! filters by model, status, tag, user and text, and opens a detail drawer
//! for a clicked row.
//!
//! ```no_run
//! use genscope::{DashboardConfig, GenerationsPage, MemorySource, Rect};
//!
//! # fn main() -> Result<(), genscope::DashboardError> {
//! let source = MemorySource::load("generations.json")?;
//! let mut page = GenerationsPage::new(source, &DashboardConfig::default())?;
//! page.layout(Rect::new(0.0, 0.0, 800.0, 600.0));
//! page.mount()?;
//! println!("{}", page.render_text());
//! # Ok(())
//! # }
//! ```

pub use genscope_core::*;
pub use genscope_widgets as widgets;

mod columns;
mod config;
mod drawer;
mod error;
mod feed;
mod filter;
mod generation;
mod page;

pub use columns::generation_columns;
pub use config::{DashboardConfig, FeedConfig, SortConfig, TableConfig};
pub use drawer::{DetailDrawer, GenerationDetail};
pub use error::DashboardError;
pub use feed::{GenerationFeed, GenerationSource, MemorySource, PageRequest, DEFAULT_PAGE_SIZE};
pub use filter::{FilterOptions, GenerationFilter};
pub use generation::{ChatMessage, Generation, MessageInput, RunError};
pub use page::{GenerationsPage, PageAction};
