// crates/core/src/error.rs
//! Error types for the core domain

use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the core domain
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record failed schema validation
    #[error("Validation failed for {entity}: {reasons}")]
    Validation { entity: String, reasons: String },

    /// A birthdate string did not match `--MM-DD` or `YYYY-MM-DD`
    #[error("Invalid birthdate: {0}")]
    InvalidBirthdate(String),

    /// A shared contact card could not be decoded
    #[error("Invalid contact card: {0}")]
    InvalidCard(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Builds a validation error from the list a `Validator` produced
    pub fn validation(entity: impl Into<String>, reasons: &[String]) -> Self {
        Self::Validation {
            entity: entity.into(),
            reasons: reasons.join("; "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_joins_reasons() {
        let err = CoreError::validation(
            "Person",
            &["Name cannot be empty".to_string(), "Goal frequency must be at least 1".to_string()],
        );
        let msg = err.to_string();
        assert!(msg.contains("Person"));
        assert!(msg.contains("Name cannot be empty; Goal frequency"));
    }

    #[test]
    fn test_invalid_card_display() {
        let err = CoreError::InvalidCard("not base64".to_string());
        assert!(err.to_string().contains("Invalid contact card"));
    }
}
