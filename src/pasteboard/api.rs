//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every pasteboard operation, whatever transport sits in
//! front of it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Parses caller strings**: paste ids and browse path segments arrive as
//!   text and are validated here, before storage is touched
//! - **Dispatches** to the appropriate command function
//! - **Applies settings**: page sizes and the navigation window
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation**: No HTML, no default display values, no status codes
//!
//! ## Generic Over DataStore
//!
//! `PasteApi<S: DataStore>` is generic over the storage backend:
//! - Production: `PasteApi<SqliteStore>`
//! - Testing: `PasteApi<InMemoryStore>`

use serde::Serialize;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::browse::{self, BrowseOpts, Page, DEFAULT_HOME_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use crate::commands::{self, create::PasteLocation};
use crate::config::PasteConfig;
use crate::diff::Diff;
use crate::error::Result;
use crate::model::{Paste, PasteAggregate, PasteForm, PasteId};
use crate::store::DataStore;

/// Listing parameters, validated once from [`PasteConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseSettings {
    pub page_size: NonZeroUsize,
    pub home_page_size: NonZeroUsize,
    pub nav_window: usize,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            home_page_size: DEFAULT_HOME_PAGE_SIZE,
            nav_window: 3,
        }
    }
}

impl BrowseSettings {
    pub fn from_config(config: &PasteConfig) -> Result<Self> {
        Ok(Self {
            page_size: config.page_size()?,
            home_page_size: config.home_page_size()?,
            nav_window: config.nav_window,
        })
    }
}

/// One page of the feed with everything needed to draw its navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    #[serde(skip)]
    pub opts: BrowseOpts,
    pub page: Page,
    pub page_count: usize,
    pub nearby: Vec<usize>,
}

/// The main API facade for pasteboard operations.
pub struct PasteApi<S: DataStore> {
    store: S,
    settings: BrowseSettings,
}

impl<S: DataStore> PasteApi<S> {
    pub fn new(store: S, settings: BrowseSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &BrowseSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_paste(&mut self, form: PasteForm) -> Result<PasteLocation> {
        commands::create::run(&mut self.store, form)
    }

    /// Annotate the paste named by `parent`.
    pub fn annotate(&mut self, parent: &str, form: PasteForm) -> Result<PasteLocation> {
        let parent = PasteId::from_str(parent)?;
        commands::create::annotate(&mut self.store, parent, form)
    }

    /// A paste with its whole annotation thread.
    pub fn view(&self, id: &str) -> Result<PasteAggregate> {
        commands::view::run(&self.store, PasteId::from_str(id)?)
    }

    pub fn paste(&self, id: &str) -> Result<(Paste, Option<u32>)> {
        commands::view::paste(&self.store, PasteId::from_str(id)?)
    }

    pub fn raw(&self, id: &str) -> Result<String> {
        commands::view::raw(&self.store, PasteId::from_str(id)?)
    }

    pub fn ordinal(&self, id: &str) -> Result<u32> {
        commands::view::ordinal(&self.store, PasteId::from_str(id)?)
    }

    pub fn home(&self) -> Result<Page> {
        commands::list::home(&self.store, self.settings.home_page_size)
    }

    /// Browse using `key/value` path segments, e.g. `["author", "alice", "page", "2"]`.
    pub fn browse<I: AsRef<str>>(&self, args: &[I]) -> Result<Listing> {
        let opts = BrowseOpts::new(self.settings.page_size).parse(args)?;
        let page = commands::list::run(&self.store, &opts)?;
        let page_count = browse::page_count(page.total, opts.page_size);
        let nearby = opts.nearby(self.settings.nav_window, page_count);
        Ok(Listing {
            opts,
            page,
            page_count,
            nearby,
        })
    }

    pub fn diff(&self, from: &str, to: &str) -> Result<Diff> {
        let from = PasteId::from_str(from)?;
        let to = PasteId::from_str(to)?;
        commands::diff::run(&self.store, from, to)
    }
}
