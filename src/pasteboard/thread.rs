//! # Annotation Threads
//!
//! Threads are flat: every annotation points straight at its root, and its
//! ordinal is its 1-based rank among the root's annotations by ascending id.
//!
//! The allocator always gives a new annotation an id above every paste already
//! in its thread, random private ids included (see [`crate::ids`]). So an
//! annotation added later sorts after the existing ones, and once assigned an
//! ordinal never changes.

use crate::error::{PasteError, Result};
use crate::model::{Paste, PasteAggregate, PasteId, ThreadEntry};
use crate::store::DataStore;

/// The ordinal of an annotation, or `None` for top-level or unknown pastes.
pub fn ordinal<S: DataStore>(store: &S, id: PasteId) -> Result<Option<u32>> {
    let n = store.annotation_ordinal(id)?;
    Ok((n > 0).then_some(n))
}

/// The ordinal of a paste the caller already holds, failing with
/// [`PasteError::NotAnnotation`] for top-level pastes.
pub fn require_ordinal<S: DataStore>(store: &S, paste: &Paste) -> Result<u32> {
    if !paste.is_annotation() {
        return Err(PasteError::NotAnnotation(paste.id));
    }
    ordinal(store, paste.id)?.ok_or(PasteError::PasteNotFound(paste.id))
}

/// All annotations of `root`, numbered from 1.
pub fn annotations<S: DataStore>(store: &S, root: PasteId) -> Result<Vec<ThreadEntry>> {
    let pastes = store.get_annotations(root)?;
    Ok(pastes
        .into_iter()
        .zip(1..)
        .map(|(paste, ordinal)| ThreadEntry { ordinal, paste })
        .collect())
}

/// A paste and its annotations, or `None` if the paste does not exist.
pub fn aggregate<S: DataStore>(store: &S, id: PasteId) -> Result<Option<PasteAggregate>> {
    let Some(paste) = store.get(id)? else {
        return Ok(None);
    };
    let annotations = annotations(store, id)?;
    Ok(Some(PasteAggregate { paste, annotations }))
}
