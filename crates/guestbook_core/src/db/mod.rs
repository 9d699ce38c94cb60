//! Guestbook database bootstrap.
//!
//! # Responsibility
//! - Open a SQLite connection and bring the `guestbook_entries` schema
//!   up to date before any entry is read or written.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A failed migration leaves the database at its previous version.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the guestbook database.
#[derive(Debug)]
pub enum DbError {
    /// The connection itself could not be established.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// Migration `version` failed and was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer guestbook build.
    SchemaTooNew { found: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "cannot open guestbook database at {location}: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "guestbook schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "guestbook schema version {found} is newer than this build supports ({supported})"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
