// crates/sync-engine/src/realtime.rs
//! Standing change subscriptions
//!
//! After the sign-in reconciliation, one subscription per collection (plus
//! the settings document) keeps this device eventually consistent with the
//! rest. Echoes of this client's own pending writes are dropped to avoid a
//! write-then-overwritten-by-stale-echo race.

use crate::error::SyncResult;
use crate::remote::{DocumentEvent, RemoteStore, SnapshotEvent, Subscription};
use crate::types::{ClientId, UserId};
use circleup_core::Settings;
use circleup_store::{Collection, SnapshotStore};
use std::sync::Arc;

/// What a realtime notification updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimeUpdate {
    Collection(Collection),
    Settings,
}

/// Invoked after an incoming snapshot has been applied to the local store,
/// so in-memory application state can reload
pub type ChangeCallback = Arc<dyn Fn(RealtimeUpdate) + Send + Sync>;

/// Opens and owns nothing itself; returns the subscription handles for the
/// session context to own
pub struct RealtimeListener;

impl RealtimeListener {
    /// Subscribes to all six collections plus settings
    ///
    /// Individual collections update independently; there is no ordering
    /// guarantee between them beyond "last delivered wins".
    pub fn start(
        remote: &Arc<dyn RemoteStore>,
        store: &Arc<SnapshotStore>,
        user: &UserId,
        client: &ClientId,
        on_change: ChangeCallback,
    ) -> SyncResult<Vec<Subscription>> {
        let mut subscriptions = Vec::with_capacity(Collection::ALL.len() + 1);

        for collection in Collection::ALL {
            let store = Arc::clone(store);
            let on_change = Arc::clone(&on_change);
            let subscription = remote.subscribe(
                user,
                collection,
                client,
                Arc::new(move |event: &SnapshotEvent| {
                    if event.has_pending_writes {
                        log::debug!("ignoring echo for {collection}");
                        return;
                    }
                    if let Err(e) = store.save_raw(collection, &event.records) {
                        log::warn!("failed to apply realtime snapshot for {collection}: {e}");
                        return;
                    }
                    if let Err(e) = store.set_realtime_initialized(true) {
                        log::warn!("failed to set realtime flag: {e}");
                    }
                    on_change(RealtimeUpdate::Collection(collection));
                }),
            )?;
            subscriptions.push(subscription);
        }

        let store_for_settings = Arc::clone(store);
        let on_change_settings = Arc::clone(&on_change);
        let settings_subscription = remote.subscribe_settings(
            user,
            client,
            Arc::new(move |event: &DocumentEvent| {
                if event.has_pending_writes {
                    log::debug!("ignoring settings echo");
                    return;
                }
                let settings: Settings = match serde_json::from_value(event.value.clone()) {
                    Ok(settings) => settings,
                    Err(e) => {
                        log::warn!("ignoring malformed settings snapshot: {e}");
                        return;
                    }
                };
                if let Err(e) = store_for_settings.save_settings(&settings) {
                    log::warn!("failed to apply settings snapshot: {e}");
                    return;
                }
                if let Err(e) = store_for_settings.set_realtime_initialized(true) {
                    log::warn!("failed to set realtime flag: {e}");
                }
                on_change_settings(RealtimeUpdate::Settings);
            }),
        )?;
        subscriptions.push(settings_subscription);

        log::info!("realtime listening started for {user}");
        Ok(subscriptions)
    }
}
