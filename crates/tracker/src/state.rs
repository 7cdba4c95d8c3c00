// crates/tracker/src/state.rs
//! In-memory application state

use crate::error::TrackerResult;
use circleup_core::{Activity, AskHistoryEntry, Group, Interaction, Person, Settings, SupportRequest};
use circleup_store::{Collection, SnapshotStore};

/// The six typed collections plus settings, loaded from the snapshot store
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub people: Vec<Person>,
    pub groups: Vec<Group>,
    pub interactions: Vec<Interaction>,
    pub activities: Vec<Activity>,
    pub support_requests: Vec<SupportRequest>,
    pub ask_history: Vec<AskHistoryEntry>,
    pub settings: Settings,
}

impl AppState {
    /// Loads the full state from a snapshot store
    pub fn load(store: &SnapshotStore) -> TrackerResult<Self> {
        Ok(Self {
            people: store.load_typed(Collection::People)?,
            groups: store.load_typed(Collection::Groups)?,
            interactions: store.load_typed(Collection::Interactions)?,
            activities: store.load_typed(Collection::Activities)?,
            support_requests: store.load_typed(Collection::SupportRequests)?,
            ask_history: store.load_typed(Collection::AskHistory)?,
            settings: store.load_settings()?,
        })
    }

    /// Writes the full state back to a snapshot store
    pub fn save(&self, store: &SnapshotStore) -> TrackerResult<()> {
        store.save_typed(Collection::People, &self.people)?;
        store.save_typed(Collection::Groups, &self.groups)?;
        store.save_typed(Collection::Interactions, &self.interactions)?;
        store.save_typed(Collection::Activities, &self.activities)?;
        store.save_typed(Collection::SupportRequests, &self.support_requests)?;
        store.save_typed(Collection::AskHistory, &self.ask_history)?;
        store.save_settings(&self.settings)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circleup_core::ConnectionGoal;

    #[test]
    fn test_state_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        let mut state = AppState::default();
        state
            .people
            .push(Person::new("Alex", ConnectionGoal::new("call", 7)));
        state.settings.circles.push("Climbing".to_string());
        state.save(&store).unwrap();

        let back = AppState::load(&store).unwrap();
        assert_eq!(back.people, state.people);
        assert_eq!(back.settings, state.settings);
        assert!(back.groups.is_empty());
    }

    #[test]
    fn test_state_load_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let state = AppState::load(&store).unwrap();
        assert!(state.people.is_empty());
        assert_eq!(state.settings, Settings::default());
    }
}
