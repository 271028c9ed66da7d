//! Schema versioning for the key-value database.
//!
//! The schema version lives in `PRAGMA user_version`. Each step is a SQL
//! script; pending steps run inside one transaction so a failed upgrade
//! leaves the previous version intact.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

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

/// Where a connection's schema stands relative to this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Current,
    Behind { db_version: u32, target: u32 },
    Ahead { db_version: u32, target: u32 },
}

/// Highest schema version this binary can produce.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Compares the connection's schema version with `latest_version()`.
pub fn schema_status(conn: &Connection) -> DbResult<SchemaStatus> {
    let db_version = current_user_version(conn)?;
    let target = latest_version();
    Ok(match db_version.cmp(&target) {
        std::cmp::Ordering::Equal => SchemaStatus::Current,
        std::cmp::Ordering::Less => SchemaStatus::Behind { db_version, target },
        std::cmp::Ordering::Greater => SchemaStatus::Ahead { db_version, target },
    })
}

/// Brings the connection up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let db_version = match schema_status(conn)? {
        SchemaStatus::Current => {
            debug!("event=db_migrate module=db status=skipped reason=current");
            return Ok(());
        }
        SchemaStatus::Ahead { db_version, target } => {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: target,
            });
        }
        SchemaStatus::Behind { db_version, .. } => db_version,
    };

    let first_pending = SCHEMA_STEPS.partition_point(|step| step.version <= db_version);
    let tx = conn.transaction()?;
    for step in &SCHEMA_STEPS[first_pending..] {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=applied version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}
