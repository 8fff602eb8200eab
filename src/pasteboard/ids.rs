//! # Identifier Allocation
//!
//! Public pastes get `max(public id) + 1`; private top-level pastes get a
//! random id drawn uniformly from `[2^62, 2^63)`. The two ranges never
//! overlap, so a public id can never collide with a private one.
//!
//! ## Private Threads
//!
//! Thread order is id order, so an annotation must always get an id above
//! every paste already in its thread. A private annotation is therefore drawn
//! at random from the `PRIVATE_THREAD_STEP` ids just above the thread's
//! current maximum. Public annotations need nothing special: `max + 1` is
//! above everything public.
//!
//! ## Caller-Supplied Ids
//!
//! A paste that arrives with an id keeps it, provided the id lies in the
//! range for its visibility. Anything else is [`PasteError::IdOutOfRange`].
//!
//! The allocator owns no storage. Stores call [`IdAllocator::allocate`] from
//! inside their insert transaction and hand it an [`IdLookup`] over the data
//! that transaction sees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PasteError, Result};
use crate::model::{Paste, PasteId};

/// The smallest private paste id (`2^62`).
pub const PRIVATE_ID_BASE: i64 = 1 << 62;

/// How many random private ids are tried before giving up.
pub const MAX_PRIVATE_ID_ATTEMPTS: usize = 8;

/// Widest gap between a private annotation's id and the thread maximum.
pub const PRIVATE_THREAD_STEP: i64 = 1 << 32;

/// The storage queries id allocation depends on.
pub trait IdLookup {
    /// Highest public id, or 0 when there are no public pastes.
    fn max_public_id(&self) -> Result<i64>;

    /// Highest id among `root` and its annotations, `None` if there are none.
    fn max_thread_id(&self, root: PasteId) -> Result<Option<i64>>;

    fn id_exists(&self, id: PasteId) -> Result<bool>;
}

pub struct IdAllocator {
    rng: StdRng,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic allocator, for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The next public id after `max_public` (0 when there are no public pastes).
    pub fn next_public(max_public: i64) -> Result<PasteId> {
        let next = max_public.max(0) + 1;
        if next >= PRIVATE_ID_BASE {
            return Err(PasteError::IdSpaceExhausted);
        }
        Ok(PasteId::new(next))
    }

    /// A random id in `[2^62, 2^63)`.
    pub fn next_private(&mut self) -> PasteId {
        PasteId::new(self.rng.gen_range(PRIVATE_ID_BASE..=i64::MAX))
    }

    /// A random private id in `(floor, floor + PRIVATE_THREAD_STEP]`, capped
    /// at `i64::MAX`.
    pub fn next_private_after(&mut self, floor: i64) -> Result<PasteId> {
        let floor = floor.max(PRIVATE_ID_BASE - 1);
        let low = floor.checked_add(1).ok_or(PasteError::IdSpaceExhausted)?;
        let high = floor.saturating_add(PRIVATE_THREAD_STEP);
        Ok(PasteId::new(self.rng.gen_range(low..=high)))
    }

    /// Checks a caller-supplied id against the range for its visibility.
    pub fn check_supplied(id: PasteId, private: bool) -> Result<PasteId> {
        let in_range = match private {
            true => id.in_private_range(),
            false => id.get() >= 1 && !id.in_private_range(),
        };
        if !in_range {
            return Err(PasteError::IdOutOfRange(id));
        }
        Ok(id)
    }

    /// Picks the id `paste` will be stored under.
    ///
    /// Storage errors from `lookup` are propagated unchanged.
    pub fn allocate<L>(&mut self, paste: &Paste, lookup: &L) -> Result<PasteId>
    where
        L: IdLookup + ?Sized,
    {
        if paste.id.is_assigned() {
            return Self::check_supplied(paste.id, paste.private);
        }
        if !paste.private {
            return Self::next_public(lookup.max_public_id()?);
        }

        let floor = match paste.annotates {
            Some(root) => Some(lookup.max_thread_id(root)?.unwrap_or(0)),
            None => None,
        };

        for _ in 0..MAX_PRIVATE_ID_ATTEMPTS {
            let id = match floor {
                Some(floor) => self.next_private_after(floor)?,
                None => self.next_private(),
            };
            if !lookup.id_exists(id)? {
                return Ok(id);
            }
            tracing::debug!(target: "pasteboard::ids", %id, "private id already taken, redrawing");
        }
        Err(PasteError::IdSpaceExhausted)
    }
}
