use super::DataStore;
use crate::browse::SearchTerms;
use crate::error::{PasteError, Result};
use crate::ids::{IdAllocator, IdLookup};
use crate::model::{Paste, PasteId};
use std::collections::BTreeMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Pastes are kept in a `BTreeMap` keyed by id, so iteration order is id order
/// and thread ordering falls out of the map for free.
#[derive(Default)]
pub struct InMemoryStore {
    pastes: BTreeMap<PasteId, Paste>,
    ids: IdAllocator,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_allocator(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn len(&self) -> usize {
        self.pastes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pastes.is_empty()
    }

    fn top_level<'a>(&'a self, terms: &'a SearchTerms) -> impl DoubleEndedIterator<Item = &'a Paste> {
        self.pastes
            .values()
            .filter(move |p| !p.private && !p.is_annotation() && terms.matches(p))
    }
}

impl IdLookup for BTreeMap<PasteId, Paste> {
    fn max_public_id(&self) -> Result<i64> {
        Ok(self
            .values()
            .filter(|p| !p.private)
            .map(|p| p.id.get())
            .max()
            .unwrap_or(0))
    }

    fn max_thread_id(&self, root: PasteId) -> Result<Option<i64>> {
        Ok(self
            .values()
            .filter(|p| p.id == root || p.annotates == Some(root))
            .map(|p| p.id.get())
            .max())
    }

    fn id_exists(&self, id: PasteId) -> Result<bool> {
        Ok(self.contains_key(&id))
    }
}

impl DataStore for InMemoryStore {
    fn insert(&mut self, paste: &Paste) -> Result<PasteId> {
        if self.simulate_write_error {
            return Err(PasteError::Store("Simulated write error".to_string()));
        }

        let id = self.ids.allocate(paste, &self.pastes)?;

        if self.pastes.contains_key(&id) {
            return Err(PasteError::Store(format!("paste {} already exists", id)));
        }

        let mut stored = paste.clone();
        stored.id = id;
        self.pastes.insert(id, stored);
        Ok(id)
    }

    fn get(&self, id: PasteId) -> Result<Option<Paste>> {
        Ok(self.pastes.get(&id).cloned())
    }

    fn get_annotations(&self, root: PasteId) -> Result<Vec<Paste>> {
        Ok(self
            .pastes
            .values()
            .filter(|p| p.annotates == Some(root))
            .cloned()
            .collect())
    }

    fn annotation_ordinal(&self, id: PasteId) -> Result<u32> {
        let Some(root) = self.pastes.get(&id).and_then(|p| p.annotates) else {
            return Ok(0);
        };
        let count = self
            .pastes
            .range(..=id)
            .filter(|(_, p)| p.annotates == Some(root))
            .count();
        u32::try_from(count).map_err(|_| PasteError::Store("ordinal overflow".to_string()))
    }

    fn count_top_level(&self, terms: &SearchTerms) -> Result<usize> {
        Ok(self.top_level(terms).count())
    }

    fn top_level_ids(
        &self,
        terms: &SearchTerms,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PasteId>> {
        Ok(self
            .top_level(terms)
            .rev()
            .skip(offset)
            .take(limit)
            .map(|p| p.id)
            .collect())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new().with_id_allocator(IdAllocator::seeded(42)),
            }
        }

        /// Insert `count` public top-level pastes with numbered content.
        pub fn with_pastes(mut self, count: usize) -> Self {
            for i in 0..count {
                let paste = Paste::new(format!("Content for paste {}", i + 1));
                self.store.insert(&paste).unwrap();
            }
            self
        }

        pub fn with_paste(mut self, paste: Paste) -> Self {
            self.store.insert(&paste).unwrap();
            self
        }

        pub fn with_private_paste(mut self, content: &str) -> Self {
            self.store
                .insert(&Paste::new(content).with_private(true))
                .unwrap();
            self
        }

        /// Insert `count` annotations under `root`.
        pub fn with_annotations(mut self, root: PasteId, count: usize) -> Self {
            let parent = self.store.get(root).unwrap().expect("root must exist");
            for i in 0..count {
                let mut paste = Paste::new(format!("Annotation {} of {}", i + 1, root));
                paste.attach_to(&parent);
                self.store.insert(&paste).unwrap();
            }
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::ids::PRIVATE_ID_BASE;

    #[test]
    fn test_public_ids_are_sequential() {
        let mut store = InMemoryStore::new();
        let ids: Vec<PasteId> = (0..5)
            .map(|i| store.insert(&Paste::new(format!("p{}", i))).unwrap())
            .collect();
        assert_eq!(ids, (1..=5).map(PasteId::new).collect::<Vec<_>>());
    }

    #[test]
    fn test_public_ids_ignore_private_pastes() {
        let mut store = StoreFixture::new()
            .with_pastes(2)
            .with_private_paste("secret")
            .store;
        let id = store.insert(&Paste::new("next")).unwrap();
        assert_eq!(id, PasteId::new(3));
    }

    #[test]
    fn test_private_ids_in_private_range() {
        let mut store = InMemoryStore::new();
        let id = store.insert(&Paste::new("s").with_private(true)).unwrap();
        assert!(id.get() >= PRIVATE_ID_BASE);
        assert!(store.get(id).unwrap().unwrap().private);
    }

    #[test]
    fn test_caller_supplied_id_is_kept() {
        let mut store = InMemoryStore::new();
        let mut paste = Paste::new("fixed");
        paste.id = PasteId::new(100);
        assert_eq!(store.insert(&paste).unwrap(), PasteId::new(100));
        // Next public id continues after the supplied one
        assert_eq!(store.insert(&Paste::new("n")).unwrap(), PasteId::new(101));
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut store = InMemoryStore::new();
        let mut paste = Paste::new("fixed");
        paste.id = PasteId::new(3);
        store.insert(&paste).unwrap();
        assert!(store.insert(&paste).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_supplied_id_must_match_visibility() {
        let mut store = InMemoryStore::new();
        let mut public = Paste::new("x");
        public.id = PasteId::new(PRIVATE_ID_BASE);
        assert!(matches!(
            store.insert(&public),
            Err(PasteError::IdOutOfRange(_))
        ));

        let mut private = Paste::new("s").with_private(true);
        private.id = PasteId::new(5);
        assert!(matches!(
            store.insert(&private),
            Err(PasteError::IdOutOfRange(_))
        ));
        assert!(store.is_empty());

        // Public allocation is unaffected by the rejected insert
        assert_eq!(store.insert(&Paste::new("n")).unwrap(), PasteId::new(1));
    }

    #[test]
    fn test_private_thread_ids_increase() {
        let mut store = InMemoryStore::new().with_id_allocator(IdAllocator::seeded(5));
        let root_id = store.insert(&Paste::new("root").with_private(true)).unwrap();
        let root = store.get(root_id).unwrap().unwrap();

        let mut last = root_id;
        for ordinal in 1..=20u32 {
            let mut reply = Paste::new(format!("r{}", ordinal));
            reply.attach_to(&root);
            let id = store.insert(&reply).unwrap();
            assert!(id > last, "{} not above {}", id, last);
            assert!(id.in_private_range());
            assert_eq!(store.annotation_ordinal(id).unwrap(), ordinal);
            last = id;
        }
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = InMemoryStore::new();
        assert!(store.get(PasteId::new(1)).unwrap().is_none());
    }

    #[test]
    fn test_insert_fails_on_write_error() {
        let mut store = InMemoryStore::new();
        store.set_simulate_write_error(true);
        assert!(store.insert(&Paste::new("x")).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_annotations_in_id_order() {
        let fixture = StoreFixture::new().with_pastes(2);
        let store = fixture
            .with_annotations(PasteId::new(1), 2)
            .with_annotations(PasteId::new(2), 1)
            .with_annotations(PasteId::new(1), 1)
            .store;

        let ids: Vec<i64> = store
            .get_annotations(PasteId::new(1))
            .unwrap()
            .iter()
            .map(|p| p.id.get())
            .collect();
        assert_eq!(ids, vec![3, 4, 6]);
    }

    #[test]
    fn test_annotation_ordinal_counts_within_thread() {
        let store = StoreFixture::new()
            .with_pastes(2)
            .with_annotations(PasteId::new(1), 1)
            .with_annotations(PasteId::new(2), 1)
            .with_annotations(PasteId::new(1), 1)
            .store;

        assert_eq!(store.annotation_ordinal(PasteId::new(3)).unwrap(), 1);
        assert_eq!(store.annotation_ordinal(PasteId::new(4)).unwrap(), 1);
        assert_eq!(store.annotation_ordinal(PasteId::new(5)).unwrap(), 2);
        // Top-level and unknown pastes have no ordinal
        assert_eq!(store.annotation_ordinal(PasteId::new(1)).unwrap(), 0);
        assert_eq!(store.annotation_ordinal(PasteId::new(99)).unwrap(), 0);
    }

    #[test]
    fn test_top_level_excludes_private_and_annotations() {
        let store = StoreFixture::new()
            .with_pastes(3)
            .with_private_paste("hidden")
            .with_annotations(PasteId::new(2), 2)
            .store;

        let terms = SearchTerms::new();
        assert_eq!(store.count_top_level(&terms).unwrap(), 3);
        assert_eq!(
            store.top_level_ids(&terms, 10, 0).unwrap(),
            vec![PasteId::new(3), PasteId::new(2), PasteId::new(1)]
        );
        assert_eq!(
            store.top_level_ids(&terms, 1, 1).unwrap(),
            vec![PasteId::new(2)]
        );
        assert!(store.top_level_ids(&terms, 10, 3).unwrap().is_empty());
    }
}
