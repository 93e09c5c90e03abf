//! Substrate adapters and write-through helpers.
//!
//! `MemoryStore` keeps values for the lifetime of the process; `FileStore`
//! writes one file per key so values survive a restart. Both are
//! best-effort: callers go through [`persist_json`], which logs a
//! persistence warning and carries on when a write fails.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

use super::traits::{BaseKeyValueStore, StorageError};

// =============================================================================
// MemoryStore
// =============================================================================

/// Process-local substrate backed by a map.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl BaseKeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Directory-backed substrate: one `<key>.json` file per key.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", file_name))
    }
}

impl BaseKeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Write-through helpers
// =============================================================================

/// Serialize `value` and write it under `key`.
///
/// Returns `false` when the write did not reach the substrate. The caller's
/// in-memory state stays authoritative for the rest of the session; the
/// change is lost on restart.
pub fn persist_json<T: Serialize + ?Sized>(
    store: &dyn BaseKeyValueStore,
    key: &str,
    value: &T,
) -> bool {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(key, error = %e, "Persistence warning: failed to serialize slot");
            return false;
        }
    };

    match store.set_item(key, &json) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                key,
                error = %e,
                "Persistence warning: substrate write failed, change kept in memory only"
            );
            false
        }
    }
}

/// Remove `key`, logging instead of failing.
pub fn remove_slot(store: &dyn BaseKeyValueStore, key: &str) -> bool {
    match store.remove_item(key) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, error = %e, "Persistence warning: substrate remove failed");
            false
        }
    }
}

/// Read and deserialize the value under `key`.
///
/// Missing, unreadable and corrupt slots all come back as `None`; the last
/// two are logged so a bad slot does not take the session down with it.
pub fn load_json<T: DeserializeOwned>(store: &dyn BaseKeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "Storage slot empty");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read storage slot, starting empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Corrupt storage slot, starting empty");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_items() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("a").unwrap(), None);

        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap(), Some("1".to_string()));

        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        store
            .set_item("marketplace.favorites", "[\"c1\"]")
            .unwrap();
        drop(store);

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get_item("marketplace.favorites").unwrap(),
            Some("[\"c1\"]".to_string())
        );
    }

    #[test]
    fn file_store_sanitizes_keys_and_ignores_missing_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set_item("../escape/attempt", "x").unwrap();
        assert!(dir.path().join(".._escape_attempt.json").exists());

        assert!(store.remove_item("never-written").is_ok());
    }

    #[test]
    fn load_json_treats_corrupt_slot_as_empty() {
        let store = MemoryStore::new();
        store.set_item("slot", "{not json").unwrap();

        let loaded: Option<Vec<String>> = load_json(&store, "slot");
        assert!(loaded.is_none());
    }

    #[test]
    fn persist_json_writes_through() {
        let store = MemoryStore::new();
        assert!(persist_json(&store, "slot", &vec!["a", "b"]));
        assert_eq!(
            store.get_item("slot").unwrap(),
            Some("[\"a\",\"b\"]".to_string())
        );
    }
}
