//! Persisted selection
//!
//! A tiny key/value store for the few bits of client state that outlive a
//! session, such as the last selected project.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;

/// Key/value storage for persisted client state
pub trait SelectionStorage: Send + Sync {
    /// Value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: &Value) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Storage backed by a single JSON object on disk
///
/// A missing file reads as empty. `load` reports a corrupt file as an error,
/// while `save` and `remove` start over from an empty object. Writes go to a
/// sibling temp file that is then renamed over the original.
pub struct JsonFileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Map<String, Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to modify, and whether corrupt content was discarded
    fn read_for_update(&self) -> Result<(Map<String, Value>, bool)> {
        match self.read() {
            Ok(entries) => Ok((entries, false)),
            Err(crate::StoreError::Serialization(e)) => {
                warn!("Discarding corrupt state file {}: {}", self.path.display(), e);
                Ok((Map::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        std::fs::write(&temp, serde_json::to_string_pretty(entries)?)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SelectionStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.read()?.remove(key))
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let (mut entries, _) = self.read_for_update()?;
        entries.insert(key.to_string(), value.clone());
        self.write(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let (mut entries, discarded) = self.read_for_update()?;
        if entries.remove(key).is_some() || discarded {
            self.write(&entries)?;
        }
        Ok(())
    }
}

/// In-memory storage, for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested").join("state.json"));

        assert_eq!(storage.load("selected").unwrap(), None);

        storage.save("selected", &json!({ "id": 1 })).unwrap();
        storage.save("other", &json!("x")).unwrap();
        assert_eq!(storage.load("selected").unwrap(), Some(json!({ "id": 1 })));

        storage.remove("selected").unwrap();
        assert_eq!(storage.load("selected").unwrap(), None);
        assert_eq!(storage.load("other").unwrap(), Some(json!("x")));

        // Nothing left behind by the atomic writes
        let files: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec!["state.json"]);
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(
            storage.load("selected"),
            Err(crate::StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_save_recovers_from_truncated_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ \"selected\": { \"id\"").unwrap();

        let storage = JsonFileStorage::new(&path);
        storage.save("selected", &json!({ "id": 2 })).unwrap();

        assert_eq!(storage.load("selected").unwrap(), Some(json!({ "id": 2 })));
    }

    #[test]
    fn test_remove_rewrites_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "garbage").unwrap();

        let storage = JsonFileStorage::new(&path);
        storage.remove("selected").unwrap();

        assert_eq!(storage.load("selected").unwrap(), None);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!({}));
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        storage.save("k", &json!(true)).unwrap();
        assert_eq!(storage.load("k").unwrap(), Some(json!(true)));
        storage.remove("k").unwrap();
        assert_eq!(storage.load("k").unwrap(), None);
    }
}
