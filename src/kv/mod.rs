//! Persistent Key-Value Storage
//!
//! The client keeps its session copy in a small string key-value store,
//! the same contract a browser's local storage offers: synchronous,
//! string keys, string values.
//!
//! - [`FileStore`]: one JSON object file on disk, replaced atomically
//! - [`MemoryStore`]: process-local, used by tests and ephemeral sessions

mod error;
mod file;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;

use std::collections::BTreeMap;

/// Synchronous string key-value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("savedAccount").unwrap(), None);

        store.set("savedAccount", "{}").unwrap();
        assert_eq!(store.get("savedAccount").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);

        store.remove("savedAccount").unwrap();
        store.remove("savedAccount").unwrap();
        assert!(store.is_empty());
    }
}
