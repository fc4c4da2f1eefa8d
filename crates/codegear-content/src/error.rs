//! Error types for the content store.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for content store operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors that can occur during content store operations.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid data for partition {partition}: {reason}")]
    InvalidPatch { partition: String, reason: String },

    #[error("notice not found: {0}")]
    NoticeNotFound(u64),

    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ContentError {
    /// Whether the error was caused by the caller's request rather than
    /// by the store itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPartition(_) | Self::MissingField(_) | Self::InvalidPatch { .. }
        )
    }
}
