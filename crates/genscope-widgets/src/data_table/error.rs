use thiserror::Error;

/// Errors raised while building a table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("duplicate column key `{0}`")]
    DuplicateColumn(String),

    #[error("column `{column}` has invalid width {width}")]
    InvalidWidth { column: String, width: f32 },
}
