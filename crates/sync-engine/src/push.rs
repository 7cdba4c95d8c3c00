// crates/sync-engine/src/push.rs
//! Write-through debounced sync
//!
//! Local mutations are pushed to the remote store only after a quiet period,
//! so keystroke-level state changes do not flood it. The debounce is a
//! poll-driven state machine: the host event loop reports changes and asks
//! whether a push is due, with the clock passed in explicitly.

use crate::error::SyncResult;
use crate::remote::RemoteStore;
use crate::types::{record_id, ClientId, UserId};
use circleup_core::Timestamp;
use circleup_store::{Collection, SnapshotStore};
use serde_json::Value;
use std::collections::HashSet;

/// Default quiet period before a push fires
pub const DEFAULT_DEBOUNCE_MS: i64 = 1500;

/// What a push did, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushReport {
    /// True when the empty-state guard skipped the push entirely
    pub skipped: bool,
    pub upserted: usize,
    pub deleted: usize,
}

impl PushReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Debounced upsert-and-prune push of local state
pub struct DebouncedPusher {
    delay_ms: i64,
    dirty_since: Option<Timestamp>,
}

impl DebouncedPusher {
    /// Creates a pusher with the given quiet period
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms,
            dirty_since: None,
        }
    }

    /// Records that local state changed, restarting the quiet period
    pub fn note_change(&mut self, now: Timestamp) {
        self.dirty_since = Some(now);
    }

    /// True once a change has been quiet for the full delay
    pub fn is_due(&self, now: Timestamp) -> bool {
        match self.dirty_since {
            Some(since) => now.as_millis() - since.as_millis() >= self.delay_ms,
            None => false,
        }
    }

    /// True if a change is waiting for its quiet period to elapse
    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Pushes local state: upsert every local record, then prune remote
    /// records missing locally
    ///
    /// The prune step is gated on the realtime-initialized flag so an empty
    /// or half-loaded local state cannot wipe a populated remote store right
    /// after sign-in. If every collection is empty the push is skipped
    /// entirely for the same reason.
    pub fn push(
        &mut self,
        remote: &dyn RemoteStore,
        store: &SnapshotStore,
        user: &UserId,
        client: &ClientId,
    ) -> SyncResult<PushReport> {
        self.dirty_since = None;

        let mut locals: Vec<(Collection, Vec<Value>)> = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            locals.push((collection, store.load_raw(collection)?));
        }

        if locals.iter().all(|(_, records)| records.is_empty()) {
            log::debug!("skipping push: all collections empty");
            return Ok(PushReport::skipped());
        }

        let prune = store.realtime_initialized();
        let mut report = PushReport::default();

        for (collection, records) in &locals {
            if !records.is_empty() {
                remote.upsert(user, *collection, client, records)?;
                report.upserted += records.len();
            }

            if prune {
                let local_ids: HashSet<&str> =
                    records.iter().filter_map(|r| record_id(r)).collect();
                for remote_record in remote.fetch(user, *collection)? {
                    if let Some(id) = record_id(&remote_record) {
                        if !local_ids.contains(id) {
                            remote.delete(user, *collection, client, id)?;
                            report.deleted += 1;
                        }
                    }
                }
            }
        }

        let settings = store.load_settings()?;
        remote.write_settings(user, client, &serde_json::to_value(&settings)?)?;

        log::debug!(
            "pushed local state: {} upserted, {} pruned",
            report.upserted,
            report.deleted
        );
        Ok(report)
    }
}

impl Default for DebouncedPusher {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::InMemoryRemoteStore;
    use serde_json::json;

    fn ts(ms: i64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn setup() -> (tempfile::TempDir, InMemoryRemoteStore, SnapshotStore, UserId, ClientId) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        (
            dir,
            InMemoryRemoteStore::new(),
            store,
            UserId::from_string("user-1"),
            ClientId::new(),
        )
    }

    #[test]
    fn test_debounce_not_due_until_quiet() {
        let mut pusher = DebouncedPusher::new(1500);
        assert!(!pusher.is_due(ts(0)));

        pusher.note_change(ts(1000));
        assert!(pusher.is_dirty());
        assert!(!pusher.is_due(ts(2000)));
        assert!(pusher.is_due(ts(2500)));
    }

    #[test]
    fn test_debounce_restarts_on_each_change() {
        let mut pusher = DebouncedPusher::new(1500);
        pusher.note_change(ts(1000));
        pusher.note_change(ts(2000));
        assert!(!pusher.is_due(ts(2600)));
        assert!(pusher.is_due(ts(3500)));
    }

    #[test]
    fn test_empty_state_guard_skips_push() {
        let (_dir, remote, store, user, client) = setup();
        let mut pusher = DebouncedPusher::default();

        let report = pusher.push(&remote, &store, &user, &client).unwrap();
        assert!(report.skipped);
        assert_eq!(report.upserted, 0);
        assert_eq!(remote.record_count(&user, Collection::People), 0);
        // The settings blob is not written either.
        assert!(remote.fetch_settings(&user).unwrap().is_none());
    }

    #[test]
    fn test_push_upserts_local_records() {
        let (_dir, remote, store, user, client) = setup();
        store
            .save_raw(
                Collection::People,
                &[json!({"id": "1", "name": "Alex", "updated_at": 100})],
            )
            .unwrap();

        let mut pusher = DebouncedPusher::default();
        pusher.note_change(ts(0));
        let report = pusher.push(&remote, &store, &user, &client).unwrap();

        assert!(!report.skipped);
        assert_eq!(report.upserted, 1);
        assert!(!pusher.is_dirty());
        assert_eq!(remote.record_count(&user, Collection::People), 1);
        assert!(remote.fetch_settings(&user).unwrap().is_some());
    }

    #[test]
    fn test_prune_gated_on_realtime_flag() {
        let (_dir, remote, store, user, client) = setup();
        remote
            .upsert(
                &user,
                Collection::Groups,
                &client,
                &[json!({"id": "stale", "updated_at": 1})],
            )
            .unwrap();
        store
            .save_raw(Collection::People, &[json!({"id": "1", "updated_at": 1})])
            .unwrap();

        // Flag not set: the stale remote record survives.
        let mut pusher = DebouncedPusher::default();
        let report = pusher.push(&remote, &store, &user, &client).unwrap();
        assert_eq!(report.deleted, 0);
        assert_eq!(remote.record_count(&user, Collection::Groups), 1);

        // Flag set: it is pruned.
        store.set_realtime_initialized(true).unwrap();
        let report = pusher.push(&remote, &store, &user, &client).unwrap();
        assert_eq!(report.deleted, 1);
        assert_eq!(remote.record_count(&user, Collection::Groups), 0);
    }

    #[test]
    fn test_push_merges_remote_fields() {
        let (_dir, remote, store, user, client) = setup();
        let other_client = ClientId::new();
        remote
            .upsert(
                &user,
                Collection::People,
                &other_client,
                &[json!({"id": "1", "archived": true, "updated_at": 1})],
            )
            .unwrap();
        store
            .save_raw(
                Collection::People,
                &[json!({"id": "1", "name": "Alex", "updated_at": 2})],
            )
            .unwrap();

        let mut pusher = DebouncedPusher::default();
        pusher.push(&remote, &store, &user, &client).unwrap();

        let records = remote.fetch(&user, Collection::People).unwrap();
        assert_eq!(records[0]["name"], "Alex");
        // Upsert merges fields rather than replacing the document.
        assert_eq!(records[0]["archived"], true);
    }
}
