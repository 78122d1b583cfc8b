//! Key-value repository contract.
//!
//! The contract is shaped after browser local storage: string keys, string
//! values, whole-value replacement. What local storage lacks, and this
//! contract adds, is an exclusive read-modify-write unit.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Io(std::io::Error),
    /// Persisted value exists but cannot be decoded or breaks an invariant.
    InvalidData(String),
    /// A backend lock was poisoned by a panicking writer.
    Poisoned(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "store io error: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Poisoned(backend) => write!(f, "{backend} store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidData(_) | Self::Poisoned(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// One staged write inside a read-modify-write unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Put { key: String, value: String },
    Delete { key: String },
}

impl KvWrite {
    pub fn put(key: &str, value: impl Into<String>) -> Self {
        Self::Put {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn delete(key: &str) -> Self {
        Self::Delete {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// Storage contract for the slot store, booking ledger and admin session.
pub trait KvRepository {
    /// Reads one value; `None` when the key was never written or was deleted.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;

    /// Runs one exclusive unit of work.
    ///
    /// `f` receives the current values of `keys` (same order) and returns its
    /// result plus the writes to commit. No other unit on the same backend
    /// interleaves with it. When `f` fails, or any write fails, nothing is
    /// committed.
    fn read_modify_write<T, F>(&self, keys: &[&str], f: F) -> RepoResult<T>
    where
        F: FnOnce(Vec<Option<String>>) -> RepoResult<(T, Vec<KvWrite>)>;

    /// Reads several keys from one consistent snapshot, without write intent.
    ///
    /// The default runs an empty unit; backends with shared read locks
    /// override it.
    fn get_many(&self, keys: &[&str]) -> RepoResult<Vec<Option<String>>> {
        self.read_modify_write(keys, |current| Ok((current, Vec::new())))
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        self.read_modify_write(&[], |_| Ok(((), vec![KvWrite::put(key, value)])))
    }

    fn delete(&self, key: &str) -> RepoResult<()> {
        self.read_modify_write(&[], |_| Ok(((), vec![KvWrite::delete(key)])))
    }
}

impl<R: KvRepository> KvRepository for &R {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn get_many(&self, keys: &[&str]) -> RepoResult<Vec<Option<String>>> {
        (**self).get_many(keys)
    }

    fn read_modify_write<T, F>(&self, keys: &[&str], f: F) -> RepoResult<T>
    where
        F: FnOnce(Vec<Option<String>>) -> RepoResult<(T, Vec<KvWrite>)>,
    {
        (**self).read_modify_write(keys, f)
    }
}
