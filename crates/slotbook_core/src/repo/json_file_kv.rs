//! JSON-file key-value repository.
//!
//! # Responsibility
//! - Persist all keys as one JSON object (`{"key": "value", ...}`).
//! - Replace the file atomically on every committed unit.
//!
//! # Invariants
//! - The file is rewritten through a sibling temp file and `rename`, so a
//!   reader never observes a half-written document.
//! - Units are exclusive within one process only; use the SQLite backend
//!   when several processes share a store.

use crate::repo::kv_repo::{KvRepository, KvWrite, RepoError, RepoResult};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Document = BTreeMap<String, String>;

/// File-backed key-value repository.
#[derive(Debug)]
pub struct JsonFileKvRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileKvRepository {
    /// Opens a store file, creating parent directories when missing.
    ///
    /// The file itself is created lazily on first commit.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RepoResult<Document> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                RepoError::InvalidData(format!(
                    "store file `{}` is not a JSON object of strings: {err}",
                    self.path.display()
                ))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, document: &Document) -> RepoResult<()> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|err| RepoError::InvalidData(format!("failed to encode store: {err}")))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KvRepository for JsonFileKvRepository {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| RepoError::Poisoned("json file"))?;
        Ok(self.load()?.remove(key))
    }

    fn read_modify_write<T, F>(&self, keys: &[&str], f: F) -> RepoResult<T>
    where
        F: FnOnce(Vec<Option<String>>) -> RepoResult<(T, Vec<KvWrite>)>,
    {
        let _guard = self.lock.lock().map_err(|_| RepoError::Poisoned("json file"))?;
        let mut document = self.load()?;

        let current = keys.iter().map(|key| document.get(*key).cloned()).collect();
        let (output, writes) = f(current)?;
        if writes.is_empty() {
            return Ok(output);
        }

        let write_count = writes.len();
        for write in writes {
            match write {
                KvWrite::Put { key, value } => {
                    document.insert(key, value);
                }
                KvWrite::Delete { key } => {
                    document.remove(&key);
                }
            }
        }
        self.save(&document)?;

        debug!(
            "event=kv_commit module=repo status=ok backend=json_file reads={} writes={write_count}",
            keys.len()
        );
        Ok(output)
    }
}
