// crates/core/src/types/activity.rs
//! Planned activity domain model

use crate::types::{EntityId, Timestamp, Validator};
use serde::{Deserialize, Serialize};

/// A planned activity; `date` absent means "TBD"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: EntityId,
    pub title: String,
    pub date: Option<Timestamp>,
    pub notes: String,
    /// Person and group ids, mixed
    pub participant_ids: Vec<EntityId>,
    /// Sync bookkeeping, not meaningful to the UI
    pub updated_at: Timestamp,
}

impl Activity {
    /// Creates a new activity with no date ("TBD")
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            title: title.into(),
            date: None,
            notes: String::new(),
            participant_ids: Vec::new(),
            updated_at: Timestamp::now(),
        }
    }

    /// Returns true if the activity has no scheduled date yet
    pub fn is_tbd(&self) -> bool {
        self.date.is_none()
    }
}

impl Validator for Activity {
    fn validate(&self) -> Result<(), Vec<String>> {
        if self.title.trim().is_empty() {
            Err(vec!["Title cannot be empty".to_string()])
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_tbd() {
        let mut activity = Activity::new("Picnic");
        assert!(activity.is_tbd());
        activity.date = Some(Timestamp::from_millis(1000));
        assert!(!activity.is_tbd());
    }

    #[test]
    fn test_activity_validation() {
        assert!(Activity::new("Picnic").is_valid());
        assert!(!Activity::new("  ").is_valid());
    }
}
