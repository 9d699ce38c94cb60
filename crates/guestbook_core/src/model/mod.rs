//! Guestbook domain model.
//!
//! # Responsibility
//! - Define the entry record and its construction rules.
//! - Keep persistence concerns out of the value itself.
//!
//! # Invariants
//! - Every persisted entry is identified by a store-assigned `EntryId`.
//! - Entries are immutable values once constructed.

pub mod entry;
