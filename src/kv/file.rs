//! File-backed key-value store
//!
//! All keys live in a single JSON object file. Every write replaces the
//! file through a temporary sibling and a rename, so a crash mid-write
//! leaves either the old or the new contents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::{StorageError, StorageResult};
use super::KeyValueStore;

/// Key-value store persisted as a JSON object file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, creating nothing until the first write.
    ///
    /// A file that is not a JSON object of strings is logged and treated as
    /// empty; the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!(path = ?path, error = %e, "Ignoring unreadable session file");
                    BTreeMap::new()
                })
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = ?path, keys = entries.len(), "Opened session store");

        Ok(Self { path, entries })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> StorageResult<()> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(io_err)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            // Keep memory in line with what is on disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save() {
            self.entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
