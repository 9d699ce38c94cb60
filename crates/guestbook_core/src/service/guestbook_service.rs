//! Guestbook use-case service.
//!
//! # Responsibility
//! - Provide the sign/list/show/remove entry points for core callers.
//! - Delegate persistence to a store implementation.
//!
//! # Invariants
//! - New entries are only built through the validating constructor.
//! - Log events carry ids and outcomes, never user-supplied text.

use crate::model::entry::{Entry, EntryId};
use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoError, RepoResult};
use log::{info, warn};

/// Use-case service over a guestbook store.
pub struct GuestbookService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> GuestbookService<R> {
    /// Creates a service using the provided store implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates form input, builds an entry and persists it.
    ///
    /// # Contract
    /// - Blank `name`, `text` or `birth` fails with `RepoError::Validation`
    ///   naming the field; nothing is persisted.
    /// - Unparseable `birth` is not an error; the entry carries the sentinel.
    /// - Returns the entry with its store-assigned identity.
    pub fn sign(&self, name: &str, text: &str, birth: &str) -> RepoResult<Entry> {
        let entry = match Entry::new(name, text, birth) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    "event=entry_sign module=service status=error error_code=invalid_input field={}",
                    err.field()
                );
                return Err(RepoError::Validation(err));
            }
        };

        let entry = self.repo.create_entry(entry)?;
        if let Some(id) = entry.id() {
            info!("event=entry_sign module=service status=ok entry_id={id}");
        }
        Ok(entry)
    }

    /// Gets one entry by identity.
    pub fn entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.repo.get_entry(id)
    }

    /// Lists entries using ordering and pagination options.
    pub fn entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(query)
    }

    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_entries()
    }

    /// Removes an entry by identity.
    ///
    /// Returns `RepoError::NotFound` unchanged when the id is unknown.
    pub fn remove(&self, id: EntryId) -> RepoResult<()> {
        self.repo.delete_entry(id)?;
        info!("event=entry_remove module=service status=ok entry_id={id}");
        Ok(())
    }
}
