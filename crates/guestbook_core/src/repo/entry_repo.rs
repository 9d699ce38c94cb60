//! Guestbook entry store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Assign identities and persist all five entry fields.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Identities come from `AUTOINCREMENT` and are never reused.
//! - An entry is inserted at most once; its identity is written once.
//! - Read paths reject malformed stored dates instead of masking them.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::entry::{Entry, EntryId, EntryValidationError, IdentityConflict};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    name,
    text,
    submitted_at,
    birth
FROM guestbook_entries";

const ENTRIES_TABLE: &str = "guestbook_entries";
const ENTRIES_COLUMNS: &[&str] = &["id", "name", "text", "submitted_at", "birth"];

const SUBMITTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const BIRTH_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    AlreadyPersisted(EntryId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "guestbook entry not found: {id}"),
            Self::AlreadyPersisted(id) => {
                write!(f, "guestbook entry is already persisted as {id}")
            }
            Self::InvalidData(message) => {
                write!(f, "invalid persisted guestbook entry data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<IdentityConflict> for RepoError {
    fn from(value: IdentityConflict) -> Self {
        Self::AlreadyPersisted(value.current)
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

/// Query options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryListQuery {
    /// Orders by descending identity when set; ascending otherwise.
    pub newest_first: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Store interface for guestbook entries.
pub trait EntryRepository {
    /// Persists a fresh entry and returns it with its identity assigned.
    fn create_entry(&self, entry: Entry) -> RepoResult<Entry>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>>;
    fn count_entries(&self) -> RepoResult<u64>;
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
}

/// SQLite-backed guestbook store.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema
    ///   does not carry the entries table as expected.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, mut entry: Entry) -> RepoResult<Entry> {
        if let Some(id) = entry.id() {
            return Err(RepoError::AlreadyPersisted(id));
        }

        self.conn.execute(
            "INSERT INTO guestbook_entries (
                name,
                text,
                submitted_at,
                birth
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                entry.name(),
                entry.text(),
                entry.submitted_at().format(SUBMITTED_AT_FORMAT).to_string(),
                entry.birth().format(BIRTH_FORMAT).to_string(),
            ],
        )?;

        entry.assign_id(EntryId::new(self.conn.last_insert_rowid()))?;
        Ok(entry)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.get()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        let mut sql = ENTRY_SELECT_SQL.to_string();
        let mut bind_values: Vec<Value> = Vec::new();

        if query.newest_first {
            sql.push_str(" ORDER BY id DESC");
        } else {
            sql.push_str(" ORDER BY id ASC");
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn count_entries(&self) -> RepoResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM guestbook_entries;", [], |row| {
                    row.get(0)
                })?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative entry count `{count}`")))
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM guestbook_entries WHERE id = ?1;", [id.get()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [ENTRIES_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(ENTRIES_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({ENTRIES_TABLE});"))?;
    let present = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in ENTRIES_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: ENTRIES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id = EntryId::new(row.get("id")?);

    let submitted_text: String = row.get("submitted_at")?;
    let submitted_at = NaiveDateTime::parse_from_str(&submitted_text, SUBMITTED_AT_FORMAT)
        .map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid timestamp `{submitted_text}` in guestbook_entries.submitted_at for entry {id}"
            ))
        })?;

    let birth_text: String = row.get("birth")?;
    let birth = NaiveDate::parse_from_str(&birth_text, BIRTH_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{birth_text}` in guestbook_entries.birth for entry {id}"
        ))
    })?;

    Ok(Entry::rehydrate(
        Some(id),
        row.get("name")?,
        row.get("text")?,
        submitted_at,
        birth,
    ))
}
