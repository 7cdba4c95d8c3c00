// crates/store/src/snapshot.rs
//! File-backed key-value snapshot storage
//!
//! One JSON array per collection plus a settings document and the
//! `realtime_initialized` flag. Missing files read as empty collections;
//! empty or unparseable files are reported as corruption, never silently
//! replaced with defaults.

use crate::error::{StoreError, StoreResult};
use circleup_core::Settings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The six synced collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    People,
    Groups,
    Interactions,
    Activities,
    SupportRequests,
    AskHistory,
}

impl Collection {
    /// Every collection, in a fixed order
    pub const ALL: [Collection; 6] = [
        Collection::People,
        Collection::Groups,
        Collection::Interactions,
        Collection::Activities,
        Collection::SupportRequests,
        Collection::AskHistory,
    ];

    /// Storage key, also the remote sub-collection name
    pub fn key(&self) -> &'static str {
        match self {
            Collection::People => "people",
            Collection::Groups => "groups",
            Collection::Interactions => "interactions",
            Collection::Activities => "activities",
            Collection::SupportRequests => "support_requests",
            Collection::AskHistory => "ask_history",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// On-device snapshot store rooted at a data directory
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Opens (and creates if needed) a store at the given directory
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::Write {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    /// Opens the store at the platform's default data directory
    pub fn open_default() -> StoreResult<Self> {
        let dirs = directories::ProjectDirs::from("app", "CircleUp", "circleup")
            .ok_or(StoreError::NoDataDir)?;
        Self::open(dirs.data_dir())
    }

    /// The directory this store lives in
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn read_json(&self, path: &Path) -> StoreResult<Option<Value>> {
        if !path.exists() {
            log::debug!("{} not found, treating as empty", path.display());
            return Ok(None);
        }

        let contents = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        // An existing-but-empty file means a write was interrupted or the
        // storage was tampered with; do not mask it as an empty collection.
        if contents.trim().is_empty() {
            return Err(StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: "file is empty or whitespace".to_string(),
            });
        }

        let value = serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn write_json(&self, path: &Path, value: &Value) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let dir = path.parent().unwrap_or(&self.root);
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        tmp.write_all(json.as_bytes()).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        tmp.persist(path).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }

    /// Loads a collection as raw JSON records (the sync engine's view)
    pub fn load_raw(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        let path = self.file_path(collection.key());
        match self.read_json(&path)? {
            None => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(StoreError::Corrupt {
                path,
                reason: "expected a JSON array".to_string(),
            }),
        }
    }

    /// Replaces a collection with raw JSON records
    pub fn save_raw(&self, collection: Collection, records: &[Value]) -> StoreResult<()> {
        let path = self.file_path(collection.key());
        self.write_json(&path, &Value::Array(records.to_vec()))
    }

    /// Loads a collection parsed into typed records
    ///
    /// Schema validation happens here: records that do not match the entity
    /// shape surface as a typed error rather than being trusted.
    pub fn load_typed<T: DeserializeOwned>(&self, collection: Collection) -> StoreResult<Vec<T>> {
        let records = self.load_raw(collection)?;
        serde_json::from_value(Value::Array(records)).map_err(|e| StoreError::Invalid {
            collection: collection.key(),
            source: e,
        })
    }

    /// Replaces a collection with typed records
    pub fn save_typed<T: Serialize>(&self, collection: Collection, records: &[T]) -> StoreResult<()> {
        let path = self.file_path(collection.key());
        let value = serde_json::to_value(records).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        self.write_json(&path, &value)
    }

    /// Loads the settings document, defaulting when absent
    pub fn load_settings(&self) -> StoreResult<Settings> {
        let path = self.file_path("settings");
        match self.read_json(&path)? {
            None => Ok(Settings::default()),
            Some(value) => serde_json::from_value(value).map_err(|e| StoreError::Invalid {
                collection: "settings",
                source: e,
            }),
        }
    }

    /// Replaces the settings document
    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let path = self.file_path("settings");
        let value = serde_json::to_value(settings).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        self.write_json(&path, &value)
    }

    /// Whether realtime listening has delivered at least one snapshot
    ///
    /// Gates the delete-missing step of the debounced push so a half-loaded
    /// local state cannot wipe a populated remote store.
    pub fn realtime_initialized(&self) -> bool {
        let path = self.root.join("realtime_initialized");
        fs::read_to_string(path)
            .map(|s| s.trim() == "1")
            .unwrap_or(false)
    }

    /// Sets or clears the realtime-initialized flag
    pub fn set_realtime_initialized(&self, initialized: bool) -> StoreResult<()> {
        let path = self.root.join("realtime_initialized");
        let dir = path.parent().unwrap_or(&self.root);
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::Write {
            path: path.clone(),
            source: e,
        })?;
        tmp.write_all(if initialized { b"1" } else { b"0" })
            .map_err(|e| StoreError::Write {
                path: path.clone(),
                source: e,
            })?;
        tmp.persist(&path).map_err(|e| StoreError::Write {
            path,
            source: e.error,
        })?;
        Ok(())
    }
}
