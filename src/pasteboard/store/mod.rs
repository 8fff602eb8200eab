//! # Storage Layer
//!
//! This module defines the storage abstraction for pasteboard. The [`DataStore`]
//! trait allows the rest of the library to work with different backends.
//!
//! ## Contract
//!
//! - **Insert is atomic.** Id allocation and the row write happen in one
//!   transaction; on failure nothing is visible to readers.
//! - **Absent is not an error.** [`DataStore::get`] returns `Ok(None)` for an
//!   unknown id. `Err` always means the backend itself failed.
//! - **Id order is thread order.** Annotations are returned by ascending id,
//!   which is insertion order within a thread.
//! - **Append only.** There is no update or delete.
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteStore`]: Production storage in a single SQLite table.
//! - [`memory::InMemoryStore`]: For testing logic without touching disk.
//!
//! ## Schema
//!
//! ```text
//! pastes
//! ├── id         INTEGER PRIMARY KEY
//! ├── title      TEXT NULL
//! ├── content    TEXT NOT NULL
//! ├── author     TEXT NULL
//! ├── language   TEXT NULL
//! ├── channel    TEXT NULL
//! ├── annotates  INTEGER NULL   -> pastes.id of the thread root
//! ├── private    INTEGER NOT NULL
//! └── created    INTEGER NOT NULL (unix seconds)
//! ```

use crate::browse::SearchTerms;
use crate::error::Result;
use crate::model::{Paste, PasteId};

pub mod memory;
pub mod sqlite;

/// Abstract interface for paste storage.
pub trait DataStore {
    /// Persist a paste, allocating an id when `paste.id` is unassigned.
    /// Returns the id the paste was stored under.
    fn insert(&mut self, paste: &Paste) -> Result<PasteId>;

    /// Fetch a single paste.
    fn get(&self, id: PasteId) -> Result<Option<Paste>>;

    /// All pastes annotating `root`, by ascending id.
    fn get_annotations(&self, root: PasteId) -> Result<Vec<Paste>>;

    /// Number of annotations sharing this paste's root with an id `<=` its own.
    /// Zero when the paste is unknown or not an annotation.
    fn annotation_ordinal(&self, id: PasteId) -> Result<u32>;

    /// Count of public top-level pastes matching the search filters.
    fn count_top_level(&self, terms: &SearchTerms) -> Result<usize>;

    /// Ids of public top-level pastes matching the search filters, newest
    /// first, skipping `offset` and returning at most `limit`.
    fn top_level_ids(&self, terms: &SearchTerms, limit: usize, offset: usize)
        -> Result<Vec<PasteId>>;
}
