//! Error type shared by every report builder.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QcError>;

#[derive(Debug, Error)]
pub enum QcError {
    /// Set algebra called with operands of different collection kinds.
    #[error("{operation}: arguments must have the same type (got {left} and {right})")]
    InvalidArgumentType {
        operation: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("report container: storage mode `{0}` not allowed (expected keyed|sequence)")]
    InvalidContainerType(String),

    #[error("report container: key `{0}` missing from record to add")]
    MissingKeyField(String),

    #[error("report container: key value `{0}` already added")]
    DuplicateKey(String),

    #[error("column `{0}` not found in table")]
    MissingColumn(String),

    #[error("column `{column}` has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("summary did not serialize to a JSON object")]
    NotARecord,
}
