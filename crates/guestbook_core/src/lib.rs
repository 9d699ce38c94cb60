//! Core domain logic for the guestbook.
//! This crate is the single source of truth for entry invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    birth_sentinel, parse_birth, Entry, EntryField, EntryId, EntryValidationError,
    IdentityConflict, BIRTH_SENTINEL,
};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::guestbook_service::GuestbookService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
