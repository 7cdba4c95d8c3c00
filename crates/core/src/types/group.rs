// crates/core/src/types/group.rs
//! Group domain model

use crate::types::{Connectable, ConnectionGoal, EntityId, Timestamp, Validator};
use serde::{Deserialize, Serialize};

/// A user-defined recurring or one-time date attached to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDate {
    pub id: EntityId,
    pub label: String,
    pub date: Timestamp,
    pub recurring: bool,
}

/// A group of people contacted together (e.g. "book club")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: EntityId,
    pub name: String,
    /// At least two members, enforced at the editing boundary not at storage
    pub member_ids: Vec<EntityId>,
    pub goal: ConnectionGoal,
    /// Advanced only by interaction logging; NEVER means not yet contacted
    pub last_connection: Timestamp,
    pub anniversary: Option<String>,
    pub custom_dates: Vec<CustomDate>,
    pub pinned: bool,
    pub snoozed_until: Option<Timestamp>,
    pub show_on_dashboard: bool,
    /// Sync bookkeeping, not meaningful to the UI
    pub updated_at: Timestamp,
}

impl Group {
    /// Creates a new group with the given name, members and goal
    pub fn new(name: impl Into<String>, member_ids: Vec<EntityId>, goal: ConnectionGoal) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            member_ids,
            goal,
            last_connection: Timestamp::NEVER,
            anniversary: None,
            custom_dates: Vec::new(),
            pinned: false,
            snoozed_until: None,
            show_on_dashboard: true,
            updated_at: Timestamp::now(),
        }
    }

    /// Removes a member id, returning true if it was present
    pub fn remove_member(&mut self, id: &EntityId) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|m| m != id);
        self.member_ids.len() != before
    }

    /// Clears any active snooze
    pub fn clear_snooze(&mut self) {
        self.snoozed_until = None;
    }
}

impl Connectable for Group {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn last_connection(&self) -> Timestamp {
        self.last_connection
    }

    fn goal(&self) -> &ConnectionGoal {
        &self.goal
    }

    fn snoozed_until(&self) -> Option<Timestamp> {
        self.snoozed_until
    }

    fn show_on_dashboard(&self) -> bool {
        self.show_on_dashboard
    }
}

impl Validator for Group {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name cannot be empty".to_string());
        }

        if self.member_ids.len() < 2 {
            errors.push("A group needs at least two members".to_string());
        }

        if self.goal.frequency_days == 0 {
            errors.push("Goal frequency must be at least 1 day".to_string());
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

    fn two_members() -> Vec<EntityId> {
        vec![EntityId::new(), EntityId::new()]
    }

    #[test]
    fn test_group_new_defaults() {
        let group = Group::new("Book club", two_members(), ConnectionGoal::new("meet", 30));
        assert_eq!(group.name, "Book club");
        assert!(group.last_connection.is_never());
        assert!(group.show_on_dashboard);
    }

    #[test]
    fn test_group_validation_success() {
        let group = Group::new("Book club", two_members(), ConnectionGoal::new("meet", 30));
        assert!(group.is_valid());
    }

    #[test]
    fn test_group_validation_too_few_members() {
        let group = Group::new(
            "Solo",
            vec![EntityId::new()],
            ConnectionGoal::new("meet", 30),
        );
        assert!(!group.is_valid());
    }

    #[test]
    fn test_group_remove_member() {
        let members = two_members();
        let target = members[0].clone();
        let mut group = Group::new("Book club", members, ConnectionGoal::new("meet", 30));

        assert!(group.remove_member(&target));
        assert_eq!(group.member_ids.len(), 1);
        assert!(!group.remove_member(&target));
    }
}
