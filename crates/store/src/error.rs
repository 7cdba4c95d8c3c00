// crates/store/src/error.rs
//! Error types for the local snapshot store

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur reading or writing the local snapshot store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read a store file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a store file
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A store file exists but is empty or not valid JSON
    #[error("Corrupt store file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A record failed schema validation at the store boundary
    #[error("Invalid {collection} record: {source}")]
    Invalid {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A backup file could not be parsed; existing state is untouched
    #[error("Invalid backup file: {0}")]
    InvalidBackup(String),

    /// Could not determine a data directory for this platform
    #[error("No usable data directory")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_display() {
        let err = StoreError::Corrupt {
            path: PathBuf::from("/data/people.json"),
            reason: "empty file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("people.json"));
        assert!(msg.contains("empty file"));
    }

    #[test]
    fn test_invalid_backup_display() {
        let err = StoreError::InvalidBackup("missing key".to_string());
        assert!(err.to_string().contains("Invalid backup file"));
    }
}
