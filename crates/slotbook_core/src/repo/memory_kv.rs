//! In-memory key-value repository for tests and ephemeral sessions.

use crate::repo::kv_repo::{KvRepository, KvWrite, RepoError, RepoResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mutex-guarded map; a unit holds the lock from first read to last write.
#[derive(Debug, Default)]
pub struct MemoryKvRepository {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-filled with raw entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl KvRepository for MemoryKvRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| RepoError::Poisoned("memory"))?;
        Ok(entries.get(key).cloned())
    }

    fn read_modify_write<T, F>(&self, keys: &[&str], f: F) -> RepoResult<T>
    where
        F: FnOnce(Vec<Option<String>>) -> RepoResult<(T, Vec<KvWrite>)>,
    {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| RepoError::Poisoned("memory"))?;

        let current = keys.iter().map(|key| entries.get(*key).cloned()).collect();
        let (output, writes) = f(current)?;

        for write in writes {
            match write {
                KvWrite::Put { key, value } => {
                    entries.insert(key, value);
                }
                KvWrite::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }
        Ok(output)
    }
}
