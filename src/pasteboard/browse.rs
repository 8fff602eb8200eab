//! # Browsing and Pagination
//!
//! The public feed lists top-level, non-private pastes, newest first, one page
//! at a time. Each listed paste is expanded into a full [`PasteAggregate`].
//!
//! ## Search Terms
//!
//! [`SearchTerms`] is an open key/value map. Only `author`, `channel` and
//! `language` constrain the query (as an AND of equalities); any other key is
//! carried along untouched so it survives in [`BrowseOpts::to_path`] and can be
//! used by whoever renders the page.
//!
//! ## Path Form
//!
//! Browse options round-trip through URL path segments:
//!
//! ```text
//! author/alice/language/rust/page/3
//! ```
//!
//! Keys and values are query-escaped, search keys are emitted in sorted order,
//! and `page/N` is only emitted for pages after the first.
//!
//! ## Page Arithmetic
//!
//! For page `p` (1-based) of size `n` over `total` matching rows, rows
//! `(p-1)*n + 1 ..= min(p*n, total)` are returned and reported as
//! `start`/`end`. An empty page reports `start = end = 0`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use crate::error::{PasteError, Result};
use crate::model::{Paste, PasteAggregate};
use crate::store::DataStore;
use crate::thread;

/// Search keys that filter the listing. Everything else is passed through.
pub const FILTER_FIELDS: [&str; 3] = ["author", "channel", "language"];

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(n) => n,
    None => unreachable!(),
};

pub const DEFAULT_HOME_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Turn a raw page size into a usable one.
pub fn page_size(n: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(n).ok_or(PasteError::InvalidPageSize)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchTerms(BTreeMap<String, String>);

impl SearchTerms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All terms, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The terms that constrain the listing, as `(column, value)` pairs.
    pub fn filters(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FILTER_FIELDS
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn matches(&self, paste: &Paste) -> bool {
        self.filters()
            .all(|(field, value)| paste.field(field) == Some(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseOpts {
    pub page: usize,
    pub page_size: NonZeroUsize,
    pub search: SearchTerms,
}

impl Default for BrowseOpts {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl BrowseOpts {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page: 1,
            page_size,
            search: SearchTerms::new(),
        }
    }

    /// Applies `key/value` path segment pairs.
    ///
    /// `page` must be a positive integer. Any other key becomes a search term.
    /// A trailing unpaired segment is ignored.
    pub fn parse<I: AsRef<str>>(mut self, args: &[I]) -> Result<Self> {
        for pair in args.chunks_exact(2) {
            let key = query_unescape(pair[0].as_ref())?;
            let value = query_unescape(pair[1].as_ref())?;
            match key.as_str() {
                "page" => {
                    self.page = match value.parse::<usize>() {
                        Ok(n) if n >= 1 => n,
                        _ => return Err(PasteError::InvalidPageNumber(value)),
                    };
                }
                _ => self.search.insert(key, value),
            }
        }
        Ok(self)
    }

    /// The same options at another page (clamped to 1).
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    pub fn prev(&self) -> Self {
        self.with_page(self.page.saturating_sub(1))
    }

    pub fn next(&self) -> Self {
        self.with_page(self.page.saturating_add(1))
    }

    /// Page numbers to offer as navigation around the current page.
    pub fn nearby(&self, window: usize, max: usize) -> Vec<usize> {
        nearby(self.page, window, max)
    }

    /// Canonical path form, see the module docs.
    pub fn to_path(&self) -> String {
        let mut parts: Vec<String> = self
            .search
            .iter()
            .flat_map(|(k, v)| [query_escape(k), query_escape(v)])
            .collect();
        if self.page > 1 {
            parts.push("page".to_string());
            parts.push(self.page.to_string());
        }
        parts.join("/")
    }

    /// Rows skipped before this page; `None` if it does not fit in `usize`.
    fn offset(&self) -> Option<usize> {
        (self.page - 1).checked_mul(self.page_size.get())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub total: usize,
    pub start: usize,
    pub end: usize,
    pub pastes: Vec<PasteAggregate>,
}

impl Page {
    pub fn page_count(&self, page_size: NonZeroUsize) -> usize {
        page_count(self.total, page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.pastes.is_empty()
    }
}

/// `ceil(total / page_size)`.
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

/// A contiguous run of page numbers centred on `page`.
///
/// The run is `2 * window + 1` wide, clamped to `[1, max]` and shifted
/// inwards near either end so it keeps its width. When `max` is smaller than
/// the width, every page is returned.
pub fn nearby(page: usize, window: usize, max: usize) -> Vec<usize> {
    let width = window.saturating_mul(2).saturating_add(1);
    if width >= max {
        return (1..=max).collect();
    }

    let (mut low, low_extra) = if page > window {
        (page - window, 0)
    } else {
        (1, window + 1 - page)
    };

    let mut high = page.saturating_add(window).saturating_add(low_extra);
    if high > max {
        low = low.saturating_sub(high - max).max(1);
        high = max;
    }

    (low..=high).collect()
}

/// Lists one page of the public feed.
pub fn list<S: DataStore>(store: &S, opts: &BrowseOpts) -> Result<Page> {
    if opts.page == 0 {
        return Err(PasteError::InvalidPageNumber(opts.page.to_string()));
    }

    let total = store.count_top_level(&opts.search)?;
    let mut page = Page {
        total,
        ..Page::default()
    };

    let Some(offset) = opts.offset() else {
        return Ok(page);
    };
    if offset >= total {
        return Ok(page);
    }

    let ids = store.top_level_ids(&opts.search, opts.page_size.get(), offset)?;
    for id in ids {
        // A row can only vanish between the two queries if the backend lost it
        if let Some(aggregate) = thread::aggregate(store, id)? {
            page.pastes.push(aggregate);
        }
    }

    if !page.pastes.is_empty() {
        page.start = offset + 1;
        page.end = offset + page.pastes.len();
    }

    tracing::debug!(
        target: "pasteboard::browse",
        total,
        page = opts.page,
        start = page.start,
        end = page.end,
        "listed pastes"
    );
    Ok(page)
}

fn query_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

fn query_unescape(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| PasteError::InvalidBrowseArgs(format!("bad escape in '{}'", s)))?;
                out.push(hex);
                i += 2;
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8(out)
        .map_err(|_| PasteError::InvalidBrowseArgs(format!("'{}' is not valid UTF-8", s)))
}
