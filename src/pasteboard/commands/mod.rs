//! # Command Layer
//!
//! This module contains the **core operations** of pasteboard. Each operation
//! lives in its own submodule and is a plain Rust function over a [`DataStore`].
//!
//! ## Role and Responsibilities
//!
//! Commands compose the lower-level pieces:
//! - Build pastes from submitted forms and insert them
//! - Turn an absent paste into [`PasteError::PasteNotFound`] where the caller
//!   named it explicitly
//! - Assemble aggregates, pages and diffs
//!
//! ## What Commands Do NOT Do
//!
//! - **String parsing**: ids and browse arguments arrive already parsed; the
//!   API facade does that
//! - **Presentation**: no HTML, no status codes, no default display values
//! - **Logging errors**: errors are returned for the caller to translate
//!
//! ## Testing Strategy
//!
//! Command tests use `InMemoryStore` (via `StoreFixture`) and cover every
//! branch; the SQLite backend is exercised by its own tests and `tests/`.
//!
//! ## Command Modules
//!
//! - [`create`]: New pastes and annotations
//! - [`view`]: A paste, its thread, its raw content, its ordinal
//! - [`list`]: The paginated public feed
//! - [`diff`]: Line diff between two pastes
//!
//! [`DataStore`]: crate::store::DataStore
//! [`PasteError::PasteNotFound`]: crate::error::PasteError::PasteNotFound

use crate::error::{PasteError, Result};
use crate::model::{Paste, PasteId};
use crate::store::DataStore;

pub mod create;
pub mod diff;
pub mod list;
pub mod view;

/// Fetch a paste the caller asked for by id.
pub(crate) fn require_paste<S: DataStore>(store: &S, id: PasteId) -> Result<Paste> {
    store.get(id)?.ok_or(PasteError::PasteNotFound(id))
}
