use crate::commands::require_paste;
use crate::error::{PasteError, Result};
use crate::model::{Paste, PasteAggregate, PasteId};
use crate::store::DataStore;
use crate::thread;

/// A paste with all of its annotations.
pub fn run<S: DataStore>(store: &S, id: PasteId) -> Result<PasteAggregate> {
    thread::aggregate(store, id)?.ok_or(PasteError::PasteNotFound(id))
}

/// A single paste and, if it is an annotation, its ordinal.
pub fn paste<S: DataStore>(store: &S, id: PasteId) -> Result<(Paste, Option<u32>)> {
    let paste = require_paste(store, id)?;
    let ordinal = match paste.is_annotation() {
        true => thread::ordinal(store, id)?,
        false => None,
    };
    Ok((paste, ordinal))
}

/// The verbatim content of a paste.
pub fn raw<S: DataStore>(store: &S, id: PasteId) -> Result<String> {
    Ok(require_paste(store, id)?.content)
}

/// The ordinal of an annotation; top-level pastes are an error.
pub fn ordinal<S: DataStore>(store: &S, id: PasteId) -> Result<u32> {
    let paste = require_paste(store, id)?;
    thread::require_ordinal(store, &paste)
}
