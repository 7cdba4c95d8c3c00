// crates/sync-engine/src/remote.rs
//! Remote collection store abstraction
//!
//! The hosted document store is an external collaborator; this module defines
//! the narrow surface the sync engine needs from it, plus an in-memory
//! implementation used by tests, the demo example and dry runs.

use crate::error::{SyncError, SyncResult};
use crate::types::{record_id, ClientId, UserId};
use circleup_store::Collection;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

/// A full-collection change notification
#[derive(Debug, Clone)]
pub struct SnapshotEvent {
    /// The complete current contents of the collection
    pub records: Vec<Value>,
    /// True when this notification reflects the receiving client's own
    /// not-yet-confirmed write (an echo, to be ignored)
    pub has_pending_writes: bool,
}

/// A settings-document change notification
#[derive(Debug, Clone)]
pub struct DocumentEvent {
    pub value: Value,
    pub has_pending_writes: bool,
}

/// Callback invoked per collection notification
pub type SnapshotCallback = Arc<dyn Fn(&SnapshotEvent) + Send + Sync>;

/// Callback invoked per settings notification
pub type DocumentCallback = Arc<dyn Fn(&DocumentEvent) + Send + Sync>;

/// Handle to a standing subscription
///
/// Closing is structural: dropping the handle also cancels, so a session that
/// owns its handles cannot leak subscriptions into another user's cache.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wraps a cancellation closure
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the subscription explicitly
    pub fn close(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// The hosted per-user document store, one sub-collection per entity type
/// plus a single settings document
pub trait RemoteStore: Send + Sync {
    /// Fetches all records of a collection
    fn fetch(&self, user: &UserId, collection: Collection) -> SyncResult<Vec<Value>>;

    /// Upserts records, merging object fields into any existing document
    /// rather than overwriting it wholesale
    fn upsert(
        &self,
        user: &UserId,
        collection: Collection,
        client: &ClientId,
        records: &[Value],
    ) -> SyncResult<()>;

    /// Deletes a record by id (missing ids are not an error)
    fn delete(
        &self,
        user: &UserId,
        collection: Collection,
        client: &ClientId,
        id: &str,
    ) -> SyncResult<()>;

    /// Fetches the settings document, if any
    fn fetch_settings(&self, user: &UserId) -> SyncResult<Option<Value>>;

    /// Replaces the settings document
    fn write_settings(&self, user: &UserId, client: &ClientId, value: &Value) -> SyncResult<()>;

    /// Opens a standing subscription on a collection
    fn subscribe(
        &self,
        user: &UserId,
        collection: Collection,
        client: &ClientId,
        callback: SnapshotCallback,
    ) -> SyncResult<Subscription>;

    /// Opens a standing subscription on the settings document
    fn subscribe_settings(
        &self,
        user: &UserId,
        client: &ClientId,
        callback: DocumentCallback,
    ) -> SyncResult<Subscription>;
}

enum Subscriber {
    Collection {
        user: UserId,
        collection: Collection,
        client: ClientId,
        callback: SnapshotCallback,
    },
    Settings {
        user: UserId,
        client: ClientId,
        callback: DocumentCallback,
    },
}

#[derive(Default)]
struct Inner {
    /// (user, collection key) -> id -> record; BTreeMap for stable order
    collections: HashMap<(String, &'static str), BTreeMap<String, Value>>,
    settings: HashMap<String, Value>,
    subscribers: HashMap<u64, Subscriber>,
    next_subscriber: u64,
    fail_requests: bool,
}

/// In-memory [`RemoteStore`] with echo-flagged change notifications
#[derive(Clone, Default)]
pub struct InMemoryRemoteStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryRemoteStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every request fails with a network error (for tests)
    pub fn set_fail_requests(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_requests = fail;
        }
    }

    /// Number of records in a collection (test helper)
    pub fn record_count(&self, user: &UserId, collection: Collection) -> usize {
        self.inner
            .lock()
            .map(|inner| {
                inner
                    .collections
                    .get(&(user.as_str().to_string(), collection.key()))
                    .map(|m| m.len())
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    fn lock(&self) -> SyncResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| SyncError::Custom("Lock poisoned".to_string()))
    }

    fn check_failure(inner: &Inner) -> SyncResult<()> {
        if inner.fail_requests {
            Err(SyncError::Network("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }

    /// Snapshots callbacks to run, then releases the lock before invoking
    /// them: listener callbacks may re-enter the store.
    fn notify_collection(&self, user: &UserId, collection: Collection, writer: &ClientId) {
        let pending = {
            let Ok(inner) = self.inner.lock() else { return };
            let records: Vec<Value> = inner
                .collections
                .get(&(user.as_str().to_string(), collection.key()))
                .map(|m| m.values().cloned().collect())
                .unwrap_or_default();

            inner
                .subscribers
                .values()
                .filter_map(|sub| match sub {
                    Subscriber::Collection {
                        user: sub_user,
                        collection: sub_collection,
                        client,
                        callback,
                    } if sub_user == user && *sub_collection == collection => Some((
                        callback.clone(),
                        SnapshotEvent {
                            records: records.clone(),
                            has_pending_writes: client == writer,
                        },
                    )),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };

        for (callback, event) in pending {
            callback(&event);
        }
    }

    fn notify_settings(&self, user: &UserId, writer: &ClientId) {
        let pending = {
            let Ok(inner) = self.inner.lock() else { return };
            let Some(value) = inner.settings.get(user.as_str()).cloned() else {
                return;
            };

            inner
                .subscribers
                .values()
                .filter_map(|sub| match sub {
                    Subscriber::Settings {
                        user: sub_user,
                        client,
                        callback,
                    } if sub_user == user => Some((
                        callback.clone(),
                        DocumentEvent {
                            value: value.clone(),
                            has_pending_writes: client == writer,
                        },
                    )),
                    _ => None,
                })
                .collect::<Vec<_>>()
        };

        for (callback, event) in pending {
            callback(&event);
        }
    }

    fn remove_subscriber(inner: &Arc<Mutex<Inner>>, id: u64) {
        if let Ok(mut inner) = inner.lock() {
            inner.subscribers.remove(&id);
        }
    }
}

/// Merges `patch`'s top-level fields into `existing` (field-merging upsert)
fn merge_fields(existing: &mut Value, patch: &Value) {
    match (existing, patch) {
        (Value::Object(existing_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                existing_map.insert(key.clone(), value.clone());
            }
        }
        (existing, patch) => *existing = patch.clone(),
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn fetch(&self, user: &UserId, collection: Collection) -> SyncResult<Vec<Value>> {
        let inner = self.lock()?;
        Self::check_failure(&inner)?;
        Ok(inner
            .collections
            .get(&(user.as_str().to_string(), collection.key()))
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    fn upsert(
        &self,
        user: &UserId,
        collection: Collection,
        client: &ClientId,
        records: &[Value],
    ) -> SyncResult<()> {
        {
            let mut inner = self.lock()?;
            Self::check_failure(&inner)?;
            let map = inner
                .collections
                .entry((user.as_str().to_string(), collection.key()))
                .or_default();
            for record in records {
                let Some(id) = record_id(record) else {
                    return Err(SyncError::Custom("record without id".to_string()));
                };
                match map.get_mut(id) {
                    Some(existing) => merge_fields(existing, record),
                    None => {
                        map.insert(id.to_string(), record.clone());
                    }
                }
            }
        }
        self.notify_collection(user, collection, client);
        Ok(())
    }

    fn delete(
        &self,
        user: &UserId,
        collection: Collection,
        client: &ClientId,
        id: &str,
    ) -> SyncResult<()> {
        let removed = {
            let mut inner = self.lock()?;
            Self::check_failure(&inner)?;
            inner
                .collections
                .get_mut(&(user.as_str().to_string(), collection.key()))
                .map(|m| m.remove(id).is_some())
                .unwrap_or(false)
        };
        if removed {
            self.notify_collection(user, collection, client);
        }
        Ok(())
    }

    fn fetch_settings(&self, user: &UserId) -> SyncResult<Option<Value>> {
        let inner = self.lock()?;
        Self::check_failure(&inner)?;
        Ok(inner.settings.get(user.as_str()).cloned())
    }

    fn write_settings(&self, user: &UserId, client: &ClientId, value: &Value) -> SyncResult<()> {
        {
            let mut inner = self.lock()?;
            Self::check_failure(&inner)?;
            inner
                .settings
                .insert(user.as_str().to_string(), value.clone());
        }
        self.notify_settings(user, client);
        Ok(())
    }

    fn subscribe(
        &self,
        user: &UserId,
        collection: Collection,
        client: &ClientId,
        callback: SnapshotCallback,
    ) -> SyncResult<Subscription> {
        let id = {
            let mut inner = self.lock()?;
            Self::check_failure(&inner)?;
            let id = inner.next_subscriber;
            inner.next_subscriber += 1;
            inner.subscribers.insert(
                id,
                Subscriber::Collection {
                    user: user.clone(),
                    collection,
                    client: client.clone(),
                    callback,
                },
            );
            id
        };
        let inner = Arc::clone(&self.inner);
        Ok(Subscription::new(move || {
            Self::remove_subscriber(&inner, id);
        }))
    }

    fn subscribe_settings(
        &self,
        user: &UserId,
        client: &ClientId,
        callback: DocumentCallback,
    ) -> SyncResult<Subscription> {
        let id = {
            let mut inner = self.lock()?;
            Self::check_failure(&inner)?;
            let id = inner.next_subscriber;
            inner.next_subscriber += 1;
            inner.subscribers.insert(
                id,
                Subscriber::Settings {
                    user: user.clone(),
                    client: client.clone(),
                    callback,
                },
            );
            id
        };
        let inner = Arc::clone(&self.inner);
        Ok(Subscription::new(move || {
            Self::remove_subscriber(&inner, id);
        }))
    }
}
