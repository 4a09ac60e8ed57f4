//! SQLite bootstrap for the memo key-value database.
//!
//! # Responsibility
//! - Open connections and bring the `kv_entries` schema up to date.
//! - Verify the table shape the key-value store reads and writes.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No memo data is read or written before the schema check passes.
//! - Failures surface as `StoreError`, the same error the store itself uses.

pub mod migrations;
mod open;

pub use migrations::{latest_version, schema_state, verify_kv_table, SchemaState, KV_TABLE};
pub use open::{open_db, open_db_in_memory};
