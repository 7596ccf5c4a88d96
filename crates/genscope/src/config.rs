//! Dashboard configuration loaded from YAML.
//!
//! Every field is optional; missing values take the defaults below.
//!
//! ```yaml
//! table:
//!   row_height: 30
//!   header_height: 36
//!   overscan: 0
//!   load_more_threshold: 600
//!   default_sort:
//!     column: created_at
//!     desc: true
//! feed:
//!   page_size: 100
//! log_level: info
//! ```

use crate::error::DashboardError;
use crate::feed::DEFAULT_PAGE_SIZE;
use genscope_core::{VirtualRowsConfig, DEFAULT_LOAD_MORE_THRESHOLD};
use genscope_widgets::data_table::{DEFAULT_HEADER_HEIGHT, DEFAULT_SORT_COLUMN};
use genscope_widgets::{SortState, TableOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Initial sort of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub column: String,
    pub desc: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_SORT_COLUMN.to_string(),
            desc: true,
        }
    }
}

/// Table sizing and trigger settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Estimated height of an unmeasured row
    pub row_height: f32,
    pub header_height: f32,
    /// Extra rows rendered above and below the viewport
    pub overscan: usize,
    /// Distance from the bottom, in pixels, that triggers a page load
    pub load_more_threshold: f32,
    pub default_sort: SortConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            row_height: VirtualRowsConfig::default().estimated_row_height,
            header_height: DEFAULT_HEADER_HEIGHT,
            overscan: 0,
            load_more_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
            default_sort: SortConfig::default(),
        }
    }
}

impl TableConfig {
    #[must_use]
    pub fn options(&self) -> TableOptions {
        TableOptions {
            rows: VirtualRowsConfig {
                estimated_row_height: self.row_height,
                overscan: self.overscan,
            },
            header_height: self.header_height,
            load_more_threshold: self.load_more_threshold,
        }
    }

    #[must_use]
    pub fn sort_state(&self) -> SortState {
        SortState::by(self.default_sort.column.clone(), self.default_sort.desc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Top-level dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub table: TableConfig,
    pub feed: FeedConfig,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            feed: FeedConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, DashboardError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String, DashboardError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let table = &self.table;
        positive("table.row_height", table.row_height)?;
        positive("table.load_more_threshold", table.load_more_threshold)?;
        if !table.header_height.is_finite() || table.header_height < 0.0 {
            return Err(DashboardError::invalid(
                "table.header_height",
                "must be zero or positive",
            ));
        }
        if table.default_sort.column.trim().is_empty() {
            return Err(DashboardError::invalid(
                "table.default_sort.column",
                "must not be empty",
            ));
        }
        if self.feed.page_size == 0 {
            return Err(DashboardError::invalid("feed.page_size", "must be at least 1"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(DashboardError::invalid(
                "log_level",
                format!("expected one of {}", LOG_LEVELS.join(", ")),
            ));
        }
        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), DashboardError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DashboardError::invalid(field, "must be positive"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.table.row_height, 30.0);
        assert_eq!(config.table.load_more_threshold, 600.0);
        assert_eq!(config.table.overscan, 0);
        assert_eq!(config.feed.page_size, 100);
        assert_eq!(config.table.sort_state(), SortState::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(DashboardConfig::from_yaml("{}").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = DashboardConfig::from_yaml(
            "table:\n  row_height: 48\n  default_sort:\n    column: tokens\nfeed:\n  page_size: 25\n",
        )
        .unwrap();
        assert_eq!(config.table.row_height, 48.0);
        assert_eq!(config.table.header_height, DEFAULT_HEADER_HEIGHT);
        assert_eq!(config.table.default_sort.column, "tokens");
        assert!(config.table.default_sort.desc);
        assert_eq!(config.feed.page_size, 25);

        let options = config.table.options();
        assert_eq!(options.rows.estimated_row_height, 48.0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let err = DashboardConfig::from_yaml("table:\n  row_height: 0\n").unwrap_err();
        assert!(matches!(err, DashboardError::InvalidConfig { ref field, .. } if field == "table.row_height"));

        let err = DashboardConfig::from_yaml("table:\n  load_more_threshold: -5\n").unwrap_err();
        assert!(matches!(err, DashboardError::InvalidConfig { ref field, .. } if field == "table.load_more_threshold"));

        assert!(DashboardConfig::from_yaml("feed:\n  page_size: 0\n").is_err());
        assert!(DashboardConfig::from_yaml("log_level: loud\n").is_err());
    }

    #[test]
    fn test_rejects_bad_yaml() {
        let err = DashboardConfig::from_yaml("table: [1, 2").unwrap_err();
        assert!(matches!(err, DashboardError::Yaml(_)));
    }

    #[test]
    fn test_yaml_round_trip_keeps_values() {
        let mut config = DashboardConfig::default();
        config.table.overscan = 3;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(DashboardConfig::from_yaml(&yaml).unwrap(), config);
    }
}
