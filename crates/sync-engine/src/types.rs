// crates/sync-engine/src/types.rs
//! Identifiers and raw-record helpers for sync

use circleup_core::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The signed-in user's identifier (the remote store namespace)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the user id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies this client instance so its own writes can be recognized as
/// echoes when they come back through a subscription
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new random client id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the client id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracts the `id` field of a raw record
pub fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

/// Extracts the `updated_at` field of a raw record, 0 when missing
pub fn record_updated_at(record: &Value) -> i64 {
    record.get("updated_at").and_then(Value::as_i64).unwrap_or(0)
}

/// Sets the `updated_at` field of a raw record
pub fn stamp_updated_at(record: &mut Value, ts: Timestamp) {
    if let Value::Object(map) = record {
        map.insert("updated_at".to_string(), Value::from(ts.as_millis()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_id_uniqueness() {
        assert_ne!(ClientId::new(), ClientId::new());
    }

    #[test]
    fn test_user_id_roundtrip() {
        let user = UserId::from_string("user-1");
        assert_eq!(user.as_str(), "user-1");
        assert_eq!(user.to_string(), "user-1");
    }

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&json!({"id": "1"})), Some("1"));
        assert_eq!(record_id(&json!({"id": 1})), None);
        assert_eq!(record_id(&json!({})), None);
    }

    #[test]
    fn test_record_updated_at_defaults_to_zero() {
        assert_eq!(record_updated_at(&json!({"updated_at": 42})), 42);
        assert_eq!(record_updated_at(&json!({})), 0);
    }

    #[test]
    fn test_stamp_updated_at() {
        let mut record = json!({"id": "1"});
        stamp_updated_at(&mut record, Timestamp::from_millis(99));
        assert_eq!(record_updated_at(&record), 99);
    }
}
