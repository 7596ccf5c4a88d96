//! Error types for the generations dashboard.

use genscope_widgets::TableError;
use thiserror::Error;

/// Errors raised by the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Config file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Config parsed but holds an unusable value.
    #[error("Invalid value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Generation data could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The generation source failed to produce a page.
    #[error("Source error: {0}")]
    Source(String),

    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

impl DashboardError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::invalid("table.row_height", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'table.row_height': must be positive"
        );
        assert_eq!(
            DashboardError::Source("offline".into()).to_string(),
            "Source error: offline"
        );
        let err = DashboardError::from(TableError::DuplicateColumn("name".into()));
        assert_eq!(err.to_string(), "Table error: duplicate column key `name`");
    }
}
