use serde::Serialize;

use crate::commands::require_paste;
use crate::error::Result;
use crate::model::{Paste, PasteForm, PasteId};
use crate::store::DataStore;
use crate::thread;

/// Where a newly stored paste can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasteLocation {
    /// The id the paste was stored under.
    pub id: PasteId,
    /// The paste to show: the thread root for annotations, else `id`.
    pub root: PasteId,
    /// Position in the root's thread, for annotations.
    pub ordinal: Option<u32>,
}

/// Stores a new top-level paste.
pub fn run<S: DataStore>(store: &mut S, form: PasteForm) -> Result<PasteLocation> {
    let paste = Paste::from_form(form);
    let id = store.insert(&paste)?;
    Ok(PasteLocation {
        id,
        root: id,
        ordinal: None,
    })
}

/// Stores a new paste as an annotation of `parent`.
///
/// If `parent` is itself an annotation the new paste joins the same thread.
/// The parent's privacy carries over regardless of the form's flag.
pub fn annotate<S: DataStore>(
    store: &mut S,
    parent: PasteId,
    form: PasteForm,
) -> Result<PasteLocation> {
    let parent = require_paste(store, parent)?;

    let mut paste = Paste::from_form(form);
    paste.attach_to(&parent);
    let id = store.insert(&paste)?;

    Ok(PasteLocation {
        id,
        root: parent.root_id(),
        ordinal: thread::ordinal(store, id)?,
    })
}
