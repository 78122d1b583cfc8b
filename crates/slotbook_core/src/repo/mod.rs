//! Key-value persistence contracts and backends.
//!
//! # Responsibility
//! - Define the narrow storage contract the services depend on.
//! - Provide SQLite, JSON-file and in-memory backends behind it.
//! - Encode/decode the persisted JSON collections.
//!
//! # Invariants
//! - Every mutation goes through `KvRepository::read_modify_write`, which
//!   commits all staged writes or none of them.
//! - Read paths reject malformed persisted state instead of masking it.

pub mod collections;
pub mod json_file_kv;
pub mod kv_repo;
pub mod memory_kv;
pub mod sqlite_kv;
