//! Schema steps for the memo key-value table.
//!
//! # Responsibility
//! - Bring `kv_entries` up to the layout this binary writes.
//! - Refuse databases written by a newer binary without touching them.
//!
//! # Invariants
//! - Step versions are strictly increasing; the last applied one is mirrored
//!   to `PRAGMA user_version` inside the same transaction.
//! - After a successful run `kv_entries` carries every column in
//!   `KV_COLUMNS`.

use crate::repo::kv_store::{StoreError, StoreResult};
use log::{debug, info};
use rusqlite::Connection;

/// Table holding one row per stored key.
pub const KV_TABLE: &str = "kv_entries";

/// Columns the key-value store depends on.
const KV_COLUMNS: &[&str] = &["key", "value", "updated_at"];

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Where a database stands relative to this binary's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Current,
    Behind { db_version: u32 },
    Newer { db_version: u32 },
}

/// Latest schema version this binary can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

pub fn schema_state(conn: &Connection) -> StoreResult<SchemaState> {
    let db_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    Ok(if db_version > latest {
        SchemaState::Newer { db_version }
    } else if db_version < latest {
        SchemaState::Behind { db_version }
    } else {
        SchemaState::Current
    })
}

/// Applies pending steps in one transaction, then checks the table shape.
pub fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    match schema_state(conn)? {
        SchemaState::Newer { db_version } => {
            return Err(StoreError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: latest_version(),
            });
        }
        SchemaState::Behind { db_version } => run_steps(conn, db_version)?,
        SchemaState::Current => {}
    }
    verify_kv_table(conn)
}

/// Fails unless `kv_entries` exists with every column the store uses.
///
/// Connections built outside `open_db` go through this check before a
/// store will wrap them.
pub fn verify_kv_table(conn: &Connection) -> StoreResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([KV_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(StoreError::MissingRequiredTable(KV_TABLE));
    }
    if let Some(&column) = KV_COLUMNS
        .iter()
        .find(|expected| !columns.iter().any(|name| name == *expected))
    {
        return Err(StoreError::MissingRequiredColumn {
            table: KV_TABLE,
            column,
        });
    }
    Ok(())
}

fn run_steps(conn: &mut Connection, from_version: u32) -> StoreResult<()> {
    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version,
        latest_version()
    );
    Ok(())
}
