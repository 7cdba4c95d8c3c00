// crates/core/src/types/common.rs
//! Shared primitives: timestamps, ids, connection goals, validation

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp in milliseconds since Unix epoch
///
/// Epoch zero is reserved as the "never" sentinel, used for
/// `last_connection` on records that have never been contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The "never" sentinel (epoch zero)
    pub const NEVER: Self = Self(0);

    /// Creates a timestamp for the current moment
    ///
    /// Falls back to epoch zero if system time is somehow before UNIX_EPOCH
    /// instead of panicking.
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_else(|_| std::time::Duration::from_secs(0))
                .as_millis() as i64,
        )
    }

    /// Creates a timestamp from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns true if this is the "never" sentinel
    pub fn is_never(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique record identifier, a string unique within its collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates an id from an existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How often a person or group should be contacted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionGoal {
    /// Connection-type label, e.g. "call" or "meet up"
    pub kind: String,
    /// Target contact cadence in days
    pub frequency_days: u32,
}

impl ConnectionGoal {
    /// Creates a new connection goal
    pub fn new(kind: impl Into<String>, frequency_days: u32) -> Self {
        Self {
            kind: kind.into(),
            frequency_days,
        }
    }
}

/// Common view over people and groups for the dashboard calculations
pub trait Connectable {
    /// Record id
    fn id(&self) -> &EntityId;
    /// Display name
    fn name(&self) -> &str;
    /// Timestamp of the last logged interaction (NEVER if none)
    fn last_connection(&self) -> Timestamp;
    /// The contact cadence goal
    fn goal(&self) -> &ConnectionGoal;
    /// Suppressed from the overdue feed until this passes
    fn snoozed_until(&self) -> Option<Timestamp>;
    /// Whether the record wants to appear on the dashboard at all
    fn show_on_dashboard(&self) -> bool;
    /// The user's own record, excluded from overdue calculations
    fn is_me(&self) -> bool {
        false
    }
}

/// Trait for types that can validate themselves
pub trait Validator {
    /// Validates the instance and returns errors if invalid
    fn validate(&self) -> Result<(), Vec<String>>;

    /// Returns true if the instance is valid
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now_is_not_never() {
        let t = Timestamp::now();
        assert!(!t.is_never());
    }

    #[test]
    fn test_timestamp_never_sentinel() {
        assert!(Timestamp::NEVER.is_never());
        assert_eq!(Timestamp::NEVER.as_millis(), 0);
        assert!(Timestamp::from_millis(0).is_never());
    }

    #[test]
    fn test_timestamp_ordering() {
        let t1 = Timestamp::from_millis(1000);
        let t2 = Timestamp::from_millis(2000);
        assert!(t1 < t2);
        assert!(Timestamp::NEVER < t1);
    }

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_entity_id_from_string() {
        let id = EntityId::from_string("person-1");
        assert_eq!(id.as_str(), "person-1");
        assert_eq!(id.to_string(), "person-1");
    }

    #[test]
    fn test_connection_goal_new() {
        let goal = ConnectionGoal::new("call", 14);
        assert_eq!(goal.kind, "call");
        assert_eq!(goal.frequency_days, 14);
    }
}
