// crates/core/src/types/interaction.rs
//! Interaction log entries

use crate::types::{EntityId, Timestamp, Validator};
use serde::{Deserialize, Serialize};

/// A logged interaction with people and/or groups
///
/// Logging (or editing) an interaction is the sole way `last_connection`
/// advances on the records it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: EntityId,
    pub date: Timestamp,
    /// Connection-type label, e.g. "call"
    pub kind: String,
    pub notes: String,
    pub person_ids: Vec<EntityId>,
    pub group_ids: Vec<EntityId>,
    /// Sync bookkeeping, not meaningful to the UI
    pub updated_at: Timestamp,
}

impl Interaction {
    /// Creates a new interaction at the given date
    pub fn new(date: Timestamp, kind: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            date,
            kind: kind.into(),
            notes: String::new(),
            person_ids: Vec::new(),
            group_ids: Vec::new(),
            updated_at: Timestamp::now(),
        }
    }

    /// Adds a person reference
    pub fn with_person(mut self, id: EntityId) -> Self {
        self.person_ids.push(id);
        self
    }

    /// Adds a group reference
    pub fn with_group(mut self, id: EntityId) -> Self {
        self.group_ids.push(id);
        self
    }

    /// Returns true if this interaction references the given id
    pub fn references(&self, id: &EntityId) -> bool {
        self.person_ids.contains(id) || self.group_ids.contains(id)
    }
}

impl Validator for Interaction {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.kind.trim().is_empty() {
            errors.push("Connection type cannot be empty".to_string());
        }

        if self.person_ids.is_empty() && self.group_ids.is_empty() {
            errors.push("An interaction must reference at least one person or group".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_builder() {
        let person = EntityId::new();
        let group = EntityId::new();
        let interaction = Interaction::new(Timestamp::from_millis(1000), "call")
            .with_person(person.clone())
            .with_group(group.clone());

        assert!(interaction.references(&person));
        assert!(interaction.references(&group));
        assert!(!interaction.references(&EntityId::new()));
    }

    #[test]
    fn test_interaction_validation_no_references() {
        let interaction = Interaction::new(Timestamp::from_millis(1000), "call");
        assert!(!interaction.is_valid());
    }

    #[test]
    fn test_interaction_validation_success() {
        let interaction =
            Interaction::new(Timestamp::from_millis(1000), "call").with_person(EntityId::new());
        assert!(interaction.is_valid());
    }
}
