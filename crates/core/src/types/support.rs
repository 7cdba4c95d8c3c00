// crates/core/src/types/support.rs
//! Support requests and the ask-history log

use crate::types::{EntityId, Timestamp, Validator};
use serde::{Deserialize, Serialize};

/// Something the user needs help with, and who could help
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportRequest {
    pub id: EntityId,
    pub name: String,
    /// Person or group ids
    pub helper_ids: Vec<EntityId>,
    /// Sync bookkeeping, not meaningful to the UI
    pub updated_at: Timestamp,
}

impl SupportRequest {
    /// Creates a new support request
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            helper_ids: Vec::new(),
            updated_at: Timestamp::now(),
        }
    }

    /// Removes a helper id, returning true if it was present
    pub fn remove_helper(&mut self, id: &EntityId) -> bool {
        let before = self.helper_ids.len();
        self.helper_ids.retain(|h| h != id);
        self.helper_ids.len() != before
    }
}

impl Validator for SupportRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        if self.name.trim().is_empty() {
            Err(vec!["Name cannot be empty".to_string()])
        } else {
            Ok(())
        }
    }
}

/// Append-only log entry linking a support request to a helper that was asked
///
/// Used to compute who was asked longest ago.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskHistoryEntry {
    pub id: EntityId,
    pub request_id: EntityId,
    pub helper_id: EntityId,
    pub asked_at: Timestamp,
    /// Sync bookkeeping, not meaningful to the UI
    pub updated_at: Timestamp,
}

impl AskHistoryEntry {
    /// Records that a helper was asked at the given time
    pub fn new(request_id: EntityId, helper_id: EntityId, asked_at: Timestamp) -> Self {
        Self {
            id: EntityId::new(),
            request_id,
            helper_id,
            asked_at,
            updated_at: Timestamp::now(),
        }
    }
}
