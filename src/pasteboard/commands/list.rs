use std::num::NonZeroUsize;

use crate::browse::{self, BrowseOpts, Page};
use crate::error::Result;
use crate::store::DataStore;

pub fn run<S: DataStore>(store: &S, opts: &BrowseOpts) -> Result<Page> {
    browse::list(store, opts)
}

/// The front page: the newest public pastes, unfiltered.
pub fn home<S: DataStore>(store: &S, page_size: NonZeroUsize) -> Result<Page> {
    browse::list(store, &BrowseOpts::new(page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PasteId;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn home_lists_newest_first() {
        let store = StoreFixture::new()
            .with_pastes(12)
            .with_private_paste("nope")
            .store;
        let page = home(&store, NonZeroUsize::new(10).unwrap()).unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.pastes.len(), 10);
        assert_eq!(page.pastes[0].paste.id, PasteId::new(12));
    }

    #[test]
    fn run_applies_opts() {
        let store = StoreFixture::new().with_pastes(3).store;
        let opts = BrowseOpts::new(NonZeroUsize::new(2).unwrap()).with_page(2);
        let page = run(&store, &opts).unwrap();
        assert_eq!((page.start, page.end), (3, 3));
        assert_eq!(page.pastes[0].paste.id, PasteId::new(1));
    }
}
