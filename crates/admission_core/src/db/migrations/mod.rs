//! Ordered schema migrations for the admission database.
//!
//! The applied version lives in `PRAGMA user_version`. Pending scripts run
//! in one transaction, so a failed upgrade leaves the previous schema.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};

/// `(version, script)`; versions strictly increase.
const MIGRATIONS: &[(u32, &str)] = &[
    (1, include_str!("0001_init.sql")),
    (2, include_str!("0002_unique_keys.sql")),
];

/// Schema version produced by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |&(version, _)| version)
}

/// Reads the schema version stored in the database header.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`].
///
/// Safe to call from several connections on the same file at once: the
/// upgrade runs under the write lock and re-reads the version first, so only
/// one connection applies each script.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
/// - `Migration` when a script fails; the schema is left untouched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let to = latest_version();
    if is_current(schema_version(conn)?, to)? {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    // Another connection may have finished the upgrade while this one waited.
    let from = schema_version(&tx)?;
    if is_current(from, to)? {
        return Ok(());
    }
    for &(version, script) in MIGRATIONS.iter().filter(|(version, _)| *version > from) {
        tx.execute_batch(script)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration { version, source })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from, to
    );
    Ok(())
}

/// Whether a schema at `from` needs no upgrade to reach `to`.
fn is_current(from: u32, to: u32) -> DbResult<bool> {
    if from > to {
        warn!(
            "event=db_migrate module=db status=error from_version={} latest_version={} error_code=schema_too_new",
            from, to
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }
    Ok(from == to)
}
