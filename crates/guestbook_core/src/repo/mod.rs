//! Store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the contract the guestbook core expects from its store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Identity assignment happens only inside store implementations.
//! - Store APIs return semantic errors (`NotFound`, `AlreadyPersisted`) in
//!   addition to DB transport errors.

pub mod entry_repo;
