// crates/sync-engine/src/lib.rs
//! Cross-device synchronization for CircleUp
//!
//! The engine keeps the Local Snapshot Store and a hosted per-user document
//! store in agreement with a deliberately simple timestamp-wins rule:
//! - a one-time full reconciliation around sign-in ([`Reconciler`]),
//! - standing per-collection subscriptions afterwards ([`RealtimeListener`]),
//! - a debounced write-through push for local mutations ([`DebouncedPusher`]).
//!
//! This is last-writer-wins over small JSON arrays, not a CRDT. Local deletes
//! are intentionally not tracked by the merge: a record deleted locally but
//! untouched remotely reappears after reconciliation, and explicit deletes
//! compensate by issuing a remote delete outside the merge path
//! ([`SessionContext::delete_record`]).

mod error;
mod push;
mod realtime;
mod reconcile;
mod remote;
mod session;
mod types;

pub use error::{SyncError, SyncResult};
pub use push::{DebouncedPusher, PushReport, DEFAULT_DEBOUNCE_MS};
pub use realtime::{ChangeCallback, RealtimeListener, RealtimeUpdate};
pub use reconcile::{merge_collection, MergePlan, Reconciler};
pub use remote::{
    DocumentCallback, DocumentEvent, InMemoryRemoteStore, RemoteStore, SnapshotCallback,
    SnapshotEvent, Subscription,
};
pub use session::SessionContext;
pub use types::{record_id, record_updated_at, stamp_updated_at, ClientId, UserId};
