//! Schema migration registry and executor.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest schema version known by this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version recorded on `conn`.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies all pending migrations in a single transaction.
///
/// # Errors
/// - `SchemaTooNew` when the database is newer than this build.
/// - `Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::SchemaTooNew {
            found: from_version,
            supported: latest,
        });
    }

    if from_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
    {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                source,
            })?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from_version} to_version={latest}");
    Ok(())
}
