//! Key-value persistence port.
//!
//! The cart is mirrored into a single slot of a string-keyed byte store, the
//! way a browser storefront uses `localStorage`. Two implementations ship:
//!
//! - [`MemoryStore`] - process-local, for tests and embedding
//! - [`FileStore`] - a JSON object on disk, one property per slot

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors that can occur when reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of string slots.
    #[error("Corrupt storage file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The value cannot be represented by this store.
    #[error("Value for key '{0}' is not valid UTF-8")]
    Encoding(String),

    /// A writer panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A string-keyed byte store.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `Ok(None)` means the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory key-value store.
///
/// Clones share the same slots, so a test can keep a handle while the cart
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let slots = self.slots.read().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        slots.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

// =============================================================================
// File store
// =============================================================================

/// Key-value store persisted as a JSON object file.
///
/// Values must be UTF-8 (as in browser storage). Writes go to a sibling temp
/// file which is then renamed over the existing file, so a crash mid-write
/// leaves the previous contents intact.
///
/// A backing file that is not a JSON object of string slots is never
/// overwritten: `get` and `set` both return [`StorageError::Corrupt`] until
/// the file is repaired or removed, since it may hold slots other than the
/// cart. A slot whose value is not a valid cart is a different case, handled
/// by `CartStore::open`, which discards it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match std::fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&contents).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_vec_pretty(slots).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let result =
            std::fs::write(&tmp, contents).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let _guard = self.lock.read().map_err(|_| StorageError::Poisoned)?;
        let mut slots = self.read_slots()?;
        Ok(slots.remove(key).map(String::into_bytes))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let value =
            String::from_utf8(value.to_vec()).map_err(|_| StorageError::Encoding(key.to_string()))?;

        let _guard = self.lock.write().map_err(|_| StorageError::Poisoned)?;
        let mut slots = self.read_slots()?;
        slots.insert(key.to_string(), value);
        self.write_slots(&slots)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_clones_share_slots() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set("key", b"value").unwrap();
        assert_eq!(handle.get("key").unwrap().as_deref(), Some(&b"value"[..]));

        handle.set("key", b"other").unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some(&b"other"[..]));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert!(store.get("key").unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        FileStore::new(&path).set("@RocketShoes:cart", b"[]").unwrap();
        FileStore::new(&path).set("other", b"1").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("@RocketShoes:cart").unwrap().as_deref(),
            Some(&b"[]"[..])
        );
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some(&b"1"[..]));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::new(&path).get("key").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_file_store_corrupt_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStore::new(&path).set("key", b"[]").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_file_store_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        // A non-empty directory at the target path makes the rename fail
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "x").unwrap();
        let store = FileStore::new(&path);

        let mut slots = BTreeMap::new();
        slots.insert("key".to_string(), "[]".to_string());
        let err = store.write_slots(&slots).unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
        assert!(!dir.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));

        let err = store.set("key", &[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, StorageError::Encoding(key) if key == "key"));
        assert!(!store.path().exists());
    }
}
