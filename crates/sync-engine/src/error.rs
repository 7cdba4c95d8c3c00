// crates/sync-engine/src/error.rs
//! Error types for sync operations

use thiserror::Error;

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during synchronization
#[derive(Debug, Error)]
pub enum SyncError {
    /// Network error talking to the remote store
    #[error("Network error: {0}")]
    Network(String),

    /// Local snapshot store error
    #[error("Storage error: {0}")]
    Storage(#[from] circleup_store::StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A realtime session is already running
    #[error("Session already started")]
    AlreadyStarted,

    /// Custom error
    #[error("{0}")]
    Custom(String),
}
