// crates/store/src/lib.rs
//! Local Snapshot Store for CircleUp
//!
//! On-device persistence: one JSON file per collection, a settings document,
//! and the `realtime_initialized` flag. This is the source of truth while
//! offline. Writes are atomic (temp file + rename) so a crash never leaves a
//! half-written collection behind.

mod backup;
mod error;
mod snapshot;

pub use backup::BackupData;
pub use error::{StoreError, StoreResult};
pub use snapshot::{Collection, SnapshotStore};
