// crates/sync-engine/src/reconcile.rs
//! One-time local/remote reconciliation
//!
//! Runs around sign-in (and on demand) to bring the Local Snapshot Store and
//! the remote collection store into agreement with a flat last-writer-wins
//! merge per record. Idempotent: a second run with no intervening changes
//! performs zero remote writes.

use crate::error::SyncResult;
use crate::remote::RemoteStore;
use crate::types::{record_id, record_updated_at, stamp_updated_at, ClientId, UserId};
use circleup_core::{Group, Interaction, Person, Settings, Timestamp};
use circleup_store::{Collection, SnapshotStore};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The outcome of merging one collection
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Full merged record set, remote order first then new local records
    pub merged: Vec<Value>,
    /// The subset whose serialized value differs from the remote copy and
    /// must be written back (write minimization)
    pub to_write: Vec<Value>,
}

/// Merges local records into the remote set by id
///
/// Conflicts resolve by comparing `updated_at`; ties favor local. Local
/// records missing remotely are inserted, stamped with `now` if they carry no
/// `updated_at`. Records present only remotely always survive: deletes are
/// not tracked here by design, callers compensate with explicit remote
/// deletes outside the merge path.
pub fn merge_collection(local: &[Value], remote: &[Value], now: Timestamp) -> MergePlan {
    let mut merged: Vec<Value> = Vec::with_capacity(remote.len() + local.len());
    let mut index_of: HashMap<String, usize> = HashMap::with_capacity(remote.len());
    let mut remote_by_id: HashMap<&str, &Value> = HashMap::with_capacity(remote.len());

    for record in remote {
        let Some(id) = record_id(record) else {
            log::warn!("skipping remote record without id");
            continue;
        };
        remote_by_id.insert(id, record);
        index_of.insert(id.to_string(), merged.len());
        merged.push(record.clone());
    }

    for record in local {
        let Some(id) = record_id(record) else {
            log::warn!("skipping local record without id");
            continue;
        };
        match index_of.get(id).copied() {
            None => {
                let mut inserted = record.clone();
                if record_updated_at(&inserted) == 0 {
                    stamp_updated_at(&mut inserted, now);
                }
                index_of.insert(id.to_string(), merged.len());
                merged.push(inserted);
            }
            Some(idx) => {
                // Local wins ties.
                if record_updated_at(record) >= record_updated_at(&merged[idx]) {
                    merged[idx] = record.clone();
                }
            }
        }
    }

    let mut to_write = Vec::new();
    for record in &merged {
        let Some(id) = record_id(record) else { continue };
        let unchanged = remote_by_id.get(id).map(|r| *r == record).unwrap_or(false);
        if !unchanged {
            to_write.push(record.clone());
        }
    }

    MergePlan { merged, to_write }
}

/// Performs the sign-in merge and the one-way pull
pub struct Reconciler {
    remote: Arc<dyn RemoteStore>,
    store: Arc<SnapshotStore>,
    client: ClientId,
}

impl Reconciler {
    /// Creates a reconciler over the given stores
    pub fn new(remote: Arc<dyn RemoteStore>, store: Arc<SnapshotStore>, client: ClientId) -> Self {
        Self {
            remote,
            store,
            client,
        }
    }

    /// Merges every collection plus the settings blob
    ///
    /// Collections are processed independently; an error aborts the failing
    /// collection and propagates, but collections already committed in this
    /// pass stay committed (no cross-collection transaction).
    pub fn reconcile(&self, user: &UserId) -> SyncResult<()> {
        let now = Timestamp::now();

        for collection in Collection::ALL {
            let remote = self.remote.fetch(user, collection)?;
            let local = self.store.load_raw(collection)?;
            let plan = merge_collection(&local, &remote, now);

            if !plan.to_write.is_empty() {
                self.remote
                    .upsert(user, collection, &self.client, &plan.to_write)?;
            }
            self.store.save_raw(collection, &plan.merged)?;

            log::info!(
                "reconciled {}: {} merged, {} written",
                collection,
                plan.merged.len(),
                plan.to_write.len()
            );
        }

        self.reconcile_settings(user)
    }

    /// Settings merge as a single blob, same last-writer rule
    fn reconcile_settings(&self, user: &UserId) -> SyncResult<()> {
        let local = self.store.load_settings()?;
        let local_value = serde_json::to_value(&local)?;

        match self.remote.fetch_settings(user)? {
            None => {
                self.remote
                    .write_settings(user, &self.client, &local_value)?;
            }
            Some(remote_value) => {
                let local_ts = local.updated_at.as_millis();
                let remote_ts = record_updated_at(&remote_value);
                if local_ts >= remote_ts {
                    if local_value != remote_value {
                        self.remote
                            .write_settings(user, &self.client, &local_value)?;
                    }
                } else {
                    let settings: Settings = serde_json::from_value(remote_value)?;
                    self.store.save_settings(&settings)?;
                }
            }
        }
        Ok(())
    }

    /// One-way read of every remote collection into the local store
    ///
    /// Remote is authoritative; no merge. Afterwards `last_connection` is
    /// recomputed for every person and group from the interaction log, since
    /// it is a cached derived value and this is the designated moment to
    /// repair drift. The `reconcile` merge path deliberately does not do
    /// this.
    pub fn pull_remote_to_local(&self, user: &UserId) -> SyncResult<()> {
        for collection in Collection::ALL {
            let records = self.remote.fetch(user, collection)?;
            self.store.save_raw(collection, &records)?;
        }

        if let Some(value) = self.remote.fetch_settings(user)? {
            let settings: Settings = serde_json::from_value(value)?;
            self.store.save_settings(&settings)?;
        }

        self.repair_last_connections()?;
        log::info!("pulled remote state for {user}");
        Ok(())
    }

    /// Recomputes `last_connection` as the max interaction date referencing
    /// each person/group, when at least one interaction exists
    fn repair_last_connections(&self) -> SyncResult<()> {
        let interactions: Vec<Interaction> = self.store.load_typed(Collection::Interactions)?;

        let mut people: Vec<Person> = self.store.load_typed(Collection::People)?;
        for person in &mut people {
            if let Some(latest) = latest_interaction(&interactions, |i| {
                i.person_ids.contains(&person.id)
            }) {
                person.last_connection = latest;
            }
        }
        self.store.save_typed(Collection::People, &people)?;

        let mut groups: Vec<Group> = self.store.load_typed(Collection::Groups)?;
        for group in &mut groups {
            if let Some(latest) =
                latest_interaction(&interactions, |i| i.group_ids.contains(&group.id))
            {
                group.last_connection = latest;
            }
        }
        self.store.save_typed(Collection::Groups, &groups)?;

        Ok(())
    }
}

fn latest_interaction(
    interactions: &[Interaction],
    references: impl Fn(&Interaction) -> bool,
) -> Option<Timestamp> {
    interactions
        .iter()
        .filter(|i| references(i))
        .map(|i| i.date)
        .max()
}
