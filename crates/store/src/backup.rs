// crates/store/src/backup.rs
//! Manual backup export and import
//!
//! The backup file is a single JSON object with top-level keys matching the
//! collection names plus `theme`. Import parses the whole file into typed
//! records before touching the store, so a malformed file never clobbers
//! existing state.

use crate::error::{StoreError, StoreResult};
use crate::snapshot::{Collection, SnapshotStore};
use circleup_core::{
    Activity, AskHistoryEntry, Group, Interaction, Person, SupportRequest, Theme,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A full export of the user's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub support_requests: Vec<SupportRequest>,
    #[serde(default)]
    pub ask_history: Vec<AskHistoryEntry>,
    pub theme: Theme,
}

impl BackupData {
    /// Snapshots the store's current contents
    pub fn from_store(store: &SnapshotStore) -> StoreResult<Self> {
        Ok(Self {
            people: store.load_typed(Collection::People)?,
            groups: store.load_typed(Collection::Groups)?,
            interactions: store.load_typed(Collection::Interactions)?,
            activities: store.load_typed(Collection::Activities)?,
            support_requests: store.load_typed(Collection::SupportRequests)?,
            ask_history: store.load_typed(Collection::AskHistory)?,
            theme: store.load_settings()?.theme,
        })
    }

    /// Writes the backup to a file
    pub fn write_to(&self, path: &Path) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::InvalidBackup(e.to_string()))?;
        fs::write(path, json).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("Exported backup to {}", path.display());
        Ok(())
    }

    /// Reads and validates a backup file without applying it
    pub fn read_from(path: &Path) -> StoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| StoreError::InvalidBackup(e.to_string()))
    }

    /// Replaces the store's contents with this backup
    pub fn apply_to(&self, store: &SnapshotStore) -> StoreResult<()> {
        store.save_typed(Collection::People, &self.people)?;
        store.save_typed(Collection::Groups, &self.groups)?;
        store.save_typed(Collection::Interactions, &self.interactions)?;
        store.save_typed(Collection::Activities, &self.activities)?;
        store.save_typed(Collection::SupportRequests, &self.support_requests)?;
        store.save_typed(Collection::AskHistory, &self.ask_history)?;

        let mut settings = store.load_settings()?;
        settings.theme = self.theme;
        store.save_settings(&settings)?;

        log::info!(
            "Imported backup: {} people, {} groups, {} interactions",
            self.people.len(),
            self.groups.len(),
            self.interactions.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circleup_core::ConnectionGoal;

    fn temp_store() -> (tempfile::TempDir, SnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_backup_roundtrip() {
        let (dir, store) = temp_store();
        let people = vec![Person::new("Alex", ConnectionGoal::new("call", 14))];
        store.save_typed(Collection::People, &people).unwrap();

        let backup = BackupData::from_store(&store).unwrap();
        let path = dir.path().join("backup.json");
        backup.write_to(&path).unwrap();

        let restored = BackupData::read_from(&path).unwrap();
        assert_eq!(restored, backup);
        assert_eq!(restored.people, people);
    }

    #[test]
    fn test_import_applies_all_collections() {
        let (dir, source_store) = temp_store();
        let people = vec![Person::new("Alex", ConnectionGoal::new("call", 14))];
        source_store.save_typed(Collection::People, &people).unwrap();
        let backup = BackupData::from_store(&source_store).unwrap();
        let path = dir.path().join("backup.json");
        backup.write_to(&path).unwrap();

        let target = SnapshotStore::open(dir.path().join("other")).unwrap();
        BackupData::read_from(&path).unwrap().apply_to(&target).unwrap();

        let loaded: Vec<Person> = target.load_typed(Collection::People).unwrap();
        assert_eq!(loaded, people);
    }

    #[test]
    fn test_invalid_backup_leaves_state_untouched() {
        let (dir, store) = temp_store();
        let people = vec![Person::new("Alex", ConnectionGoal::new("call", 14))];
        store.save_typed(Collection::People, &people).unwrap();

        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"people\": \"not an array\"}").unwrap();

        assert!(matches!(
            BackupData::read_from(&path),
            Err(StoreError::InvalidBackup(_))
        ));

        // Parsing failed before anything was applied.
        let loaded: Vec<Person> = store.load_typed(Collection::People).unwrap();
        assert_eq!(loaded, people);
    }

    #[test]
    fn test_backup_missing_keys_default_empty() {
        let json = r#"{"theme": "dark"}"#;
        let backup: BackupData = serde_json::from_str(json).unwrap();
        assert!(backup.people.is_empty());
        assert_eq!(backup.theme, Theme::Dark);
    }
}
