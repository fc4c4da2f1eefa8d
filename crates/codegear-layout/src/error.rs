//! Error types for table layout state.

use std::path::PathBuf;

use thiserror::Error;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("unknown column {column} in table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("invalid table definition {table}: {reason}")]
    InvalidDefinition { table: String, reason: String },

    #[error("layout storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
