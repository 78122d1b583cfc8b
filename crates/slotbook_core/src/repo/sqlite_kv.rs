//! SQLite-backed key-value repository.
//!
//! # Invariants
//! - Each read-modify-write unit runs in one `BEGIN IMMEDIATE` transaction,
//!   so concurrent writers (other connections or processes) serialize.
//! - A failed unit rolls back on drop.
//! - `get_many` reads inside a deferred transaction and never takes the
//!   write lock.

use crate::repo::kv_repo::{KvRepository, KvWrite, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Key-value repository over the `kv_entries` table.
#[derive(Clone, Copy)]
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        read_value(self.conn, key)
    }

    fn get_many(&self, keys: &[&str]) -> RepoResult<Vec<Option<String>>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let values = keys
            .iter()
            .map(|key| read_value(&tx, key))
            .collect::<RepoResult<Vec<_>>>()?;
        tx.commit()?;
        Ok(values)
    }

    fn read_modify_write<T, F>(&self, keys: &[&str], f: F) -> RepoResult<T>
    where
        F: FnOnce(Vec<Option<String>>) -> RepoResult<(T, Vec<KvWrite>)>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let current = keys
            .iter()
            .map(|key| read_value(&tx, key))
            .collect::<RepoResult<Vec<_>>>()?;
        let (output, writes) = f(current)?;

        for write in &writes {
            match write {
                KvWrite::Put { key, value } => {
                    tx.execute(
                        "INSERT INTO kv_entries (key, value, updated_at)
                         VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                         ON CONFLICT(key) DO UPDATE SET
                            value = excluded.value,
                            updated_at = excluded.updated_at;",
                        params![key, value],
                    )?;
                }
                KvWrite::Delete { key } => {
                    tx.execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
                }
            }
        }
        tx.commit()?;

        debug!(
            "event=kv_commit module=repo status=ok backend=sqlite reads={} writes={}",
            keys.len(),
            writes.len()
        );
        Ok(output)
    }
}

fn read_value(conn: &Connection, key: &str) -> RepoResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_entries WHERE key = ?1;",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}
