// crates/tracker/src/error.rs
//! Error types for the tracker layer

use circleup_core::CoreError;
use circleup_store::StoreError;
use thiserror::Error;

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors that can occur in the tracker layer
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Domain error, including validation failures
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Snapshot store error
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TrackerError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
