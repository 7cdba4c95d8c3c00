// crates/sync-engine/src/session.rs
//! Per-sign-in session context
//!
//! The session owns the signed-in user id, this client's identity, the live
//! subscription set and the debounced pusher. Teardown is structural: the
//! subscriptions die with the context, so a new sign-in cannot inherit a
//! listener writing into the wrong user's local cache.

use crate::error::{SyncError, SyncResult};
use crate::push::{DebouncedPusher, PushReport};
use crate::realtime::{ChangeCallback, RealtimeListener};
use crate::reconcile::Reconciler;
use crate::remote::{RemoteStore, Subscription};
use crate::types::{ClientId, UserId};
use circleup_core::Timestamp;
use circleup_store::{Collection, SnapshotStore};
use std::sync::Arc;

/// Sync lifecycle for one signed-in (or signed-out) user
pub struct SessionContext {
    user: Option<UserId>,
    client: ClientId,
    remote: Arc<dyn RemoteStore>,
    store: Arc<SnapshotStore>,
    pusher: DebouncedPusher,
    subscriptions: Vec<Subscription>,
}

impl SessionContext {
    /// Creates a session for a signed-in user
    pub fn signed_in(
        user: UserId,
        remote: Arc<dyn RemoteStore>,
        store: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            user: Some(user),
            client: ClientId::new(),
            remote,
            store,
            pusher: DebouncedPusher::default(),
            subscriptions: Vec::new(),
        }
    }

    /// Creates a signed-out session; every sync operation no-ops gracefully
    pub fn signed_out(remote: Arc<dyn RemoteStore>, store: Arc<SnapshotStore>) -> Self {
        Self {
            user: None,
            client: ClientId::new(),
            remote,
            store,
            pusher: DebouncedPusher::default(),
            subscriptions: Vec::new(),
        }
    }

    /// The signed-in user, if any
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// This client's identity (used for echo detection)
    pub fn client(&self) -> &ClientId {
        &self.client
    }

    /// True while realtime subscriptions are open
    pub fn is_listening(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    fn reconciler(&self) -> Reconciler {
        Reconciler::new(
            Arc::clone(&self.remote),
            Arc::clone(&self.store),
            self.client.clone(),
        )
    }

    /// Runs the sign-in sequence: one full reconciliation, then realtime
    /// listening, strictly in that order so the listener never sees a
    /// half-merged state
    pub fn start(&mut self, on_change: ChangeCallback) -> SyncResult<()> {
        if self.is_listening() {
            return Err(SyncError::AlreadyStarted);
        }
        let Some(user) = self.user.clone() else {
            log::debug!("no signed-in user, skipping sync start");
            return Ok(());
        };

        self.reconciler().reconcile(&user)?;
        self.subscriptions =
            RealtimeListener::start(&self.remote, &self.store, &user, &self.client, on_change)?;
        Ok(())
    }

    /// Closes every subscription; required before starting a session for a
    /// different user
    pub fn stop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.close();
        }
        log::info!("sync session stopped");
    }

    /// On-demand full merge (no-op when signed out)
    pub fn reconcile(&self) -> SyncResult<()> {
        match &self.user {
            Some(user) => self.reconciler().reconcile(user),
            None => Ok(()),
        }
    }

    /// On-demand one-way pull, remote authoritative (no-op when signed out)
    pub fn pull_remote_to_local(&self) -> SyncResult<()> {
        match &self.user {
            Some(user) => self.reconciler().pull_remote_to_local(user),
            None => Ok(()),
        }
    }

    /// Reports a local state change to the debouncer
    pub fn note_change(&mut self, now: Timestamp) {
        self.pusher.note_change(now);
    }

    /// Pushes if the quiet period has elapsed; `None` when not due or
    /// signed out
    pub fn push_if_due(&mut self, now: Timestamp) -> SyncResult<Option<PushReport>> {
        let Some(user) = self.user.clone() else {
            return Ok(None);
        };
        if !self.pusher.is_due(now) {
            return Ok(None);
        }
        let report = self
            .pusher
            .push(self.remote.as_ref(), &self.store, &user, &self.client)?;
        Ok(Some(report))
    }

    /// Issues the remote delete that compensates for the merge path not
    /// tracking deletions (no-op when signed out)
    pub fn delete_record(&self, collection: Collection, id: &str) -> SyncResult<()> {
        match &self.user {
            Some(user) => self.remote.delete(user, collection, &self.client, id),
            None => Ok(()),
        }
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.stop();
    }
}
