use crate::commands::require_paste;
use crate::diff::Diff;
use crate::error::Result;
use crate::model::PasteId;
use crate::store::DataStore;

/// Diff the contents of two stored pastes, `from` being the old side.
pub fn run<S: DataStore>(store: &S, from: PasteId, to: PasteId) -> Result<Diff> {
    let from = require_paste(store, from)?;
    let to = require_paste(store, to)?;
    Ok(Diff::new(from, to))
}
