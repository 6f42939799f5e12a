//! Session State Container
//!
//! Holds the single immutable [`Snapshot`] of the client session. Every
//! change produces a new snapshot; the `account` field is mirrored to the
//! key-value store before the new snapshot becomes visible, so after any
//! successful update the persisted copy equals the in-memory one.

use std::sync::Arc;

use crate::kv::{KeyValueStore, StorageResult};
use crate::model::Account;

/// Default storage key for the saved account
pub const DEFAULT_STORAGE_KEY: &str = "savedAccount";

/// Immutable session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Logged-in account, if any
    pub account: Option<Account>,
}

/// A replacement for one snapshot field
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Account(Option<Account>),
}

/// Owner of the current snapshot and its persisted copy
pub struct StateStore<S> {
    current: Arc<Snapshot>,
    storage: S,
    key: String,
}

impl<S: KeyValueStore> StateStore<S> {
    /// Create an empty container without reading storage
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            current: Arc::new(Snapshot::default()),
            storage,
            key: key.into(),
        }
    }

    /// Create the container, restoring a saved account from storage.
    ///
    /// A saved value that no longer decodes is dropped with a warning and
    /// the session starts empty.
    pub fn load(storage: S, key: impl Into<String>) -> StorageResult<Self> {
        let mut store = Self::new(storage, key);

        if let Some(saved) = store.storage.get(&store.key)? {
            match serde_json::from_str::<Option<Account>>(&saved) {
                Ok(account) => {
                    if let Some(account) = &account {
                        tracing::info!(user = %account.user, "Restored saved session");
                    }
                    store.current = Arc::new(Snapshot { account });
                }
                Err(e) => {
                    tracing::warn!(key = %store.key, error = %e, "Ignoring unreadable saved session");
                }
            }
        }

        Ok(store)
    }

    /// Latest snapshot
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Account in the latest snapshot
    pub fn account(&self) -> Option<&Account> {
        self.current.account.as_ref()
    }

    /// Storage key the account is mirrored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backing key-value store
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replace one field, producing a new snapshot.
    ///
    /// Storage is written first; if that fails the previous snapshot stays
    /// current and the error is returned.
    pub fn update(&mut self, update: Update) -> StorageResult<Arc<Snapshot>> {
        let next = match update {
            Update::Account(account) => Snapshot { account },
        };

        self.persist(&next)?;
        self.current = Arc::new(next);
        Ok(self.current())
    }

    fn persist(&mut self, snapshot: &Snapshot) -> StorageResult<()> {
        match &snapshot.account {
            Some(account) => {
                let json = serde_json::to_string(account)?;
                self.storage.set(&self.key, &json)?;
                tracing::debug!(user = %account.user, "Saved session");
            }
            None => {
                self.storage.remove(&self.key)?;
                tracing::debug!("Cleared saved session");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileStore, MemoryStore};
    use crate::model::Transaction;
    use tempfile::tempdir;

    fn test_account(balance: f64) -> Account {
        Account::new("test", "$")
            .description("Test account")
            .balance(balance)
            .transaction(Transaction::new("2024-01-01", "Salary", balance))
    }

    fn persisted(store: &StateStore<MemoryStore>) -> Option<Account> {
        store
            .storage()
            .get(store.key())
            .unwrap()
            .map(|json| serde_json::from_str(&json).unwrap())
    }

    #[test]
    fn test_starts_empty() {
        let store = StateStore::load(MemoryStore::new(), DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(*store.current(), Snapshot::default());
        assert!(store.account().is_none());
    }

    #[test]
    fn test_every_update_is_mirrored() {
        let mut store = StateStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);

        let values = [
            Some(test_account(10.0)),
            Some(test_account(20.0)),
            None,
            Some(test_account(30.0)),
            None,
        ];

        for value in values {
            store.update(Update::Account(value.clone())).unwrap();
            assert_eq!(store.current().account, value);
            assert_eq!(persisted(&store), value);
        }

        // Logged out: key removed rather than left holding a stale copy
        assert_eq!(store.storage().get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_old_snapshot_is_not_mutated() {
        let mut store = StateStore::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
        store.update(Update::Account(Some(test_account(10.0)))).unwrap();

        let before = store.current();
        store.update(Update::Account(None)).unwrap();

        assert_eq!(before.account, Some(test_account(10.0)));
        assert_eq!(store.current().account, None);
    }

    #[test]
    fn test_session_restored_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = StateStore::load(FileStore::open(&path).unwrap(), "savedAccount").unwrap();
        store.update(Update::Account(Some(test_account(42.0)))).unwrap();
        drop(store);

        let restored = StateStore::load(FileStore::open(&path).unwrap(), "savedAccount").unwrap();
        assert_eq!(restored.account(), Some(&test_account(42.0)));
    }

    #[test]
    fn test_unreadable_saved_value_starts_empty() {
        let mut storage = MemoryStore::new();
        storage.set(DEFAULT_STORAGE_KEY, "{broken").unwrap();

        let store = StateStore::load(storage, DEFAULT_STORAGE_KEY).unwrap();
        assert!(store.account().is_none());
    }

    #[test]
    fn test_saved_null_starts_empty() {
        let mut storage = MemoryStore::new();
        storage.set(DEFAULT_STORAGE_KEY, "null").unwrap();

        let store = StateStore::load(storage, DEFAULT_STORAGE_KEY).unwrap();
        assert!(store.account().is_none());
    }

    #[test]
    fn test_failed_persist_keeps_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut store = StateStore::new(FileStore::open(&path).unwrap(), DEFAULT_STORAGE_KEY);

        // Replace the file location with a directory so the next write fails
        std::fs::create_dir(&path).unwrap();

        assert!(store.update(Update::Account(Some(test_account(1.0)))).is_err());
        assert!(store.account().is_none());
    }
}
