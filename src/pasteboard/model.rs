//! # Domain Model
//!
//! This module defines the core data structures: [`PasteId`], [`Paste`],
//! [`PasteForm`] and the thread aggregates [`ThreadEntry`] / [`PasteAggregate`].
//!
//! ## Identifiers
//!
//! Paste ids are positive 63-bit integers split into two disjoint ranges:
//!
//! ```text
//! 0                      unassigned (allocated on insert)
//! [1, 2^62)              public pastes, sequential
//! [2^62, 2^63)           private pastes, random
//! ```
//!
//! Public ids are sequential and guessable. Private ids are random, and being
//! hard to guess is the only thing keeping a private paste private.
//!
//! ## Threading
//!
//! A paste either stands alone (top-level) or `annotates` a root paste. Threads
//! are flat: annotating an annotation attaches the new paste to the thread root
//! (see [`Paste::attach_to`]). An annotation's position in its thread (its
//! *ordinal*) is never stored; it is derived from id order when queried.
//!
//! ## Optional Fields
//!
//! `title`, `author`, `language` and `channel` are plain `Option<String>`.
//! Display fallbacks ("untitled", "anonymous", ...) belong to whoever renders them.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PasteError;
use crate::ids::PRIVATE_ID_BASE;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PasteId(i64);

impl PasteId {
    /// Sentinel for "not yet allocated".
    pub const UNASSIGNED: PasteId = PasteId(0);

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// True if the id lies in the private range `[2^62, 2^63)`.
    pub fn in_private_range(self) -> bool {
        self.0 >= PRIVATE_ID_BASE
    }
}

impl fmt::Display for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PasteId {
    type Err = PasteError;

    /// Parses a caller-supplied id. Zero and negative values can never name a
    /// stored paste, so they are rejected along with non-numeric input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(PasteId(n)),
            _ => Err(PasteError::InvalidPasteId(s.to_string())),
        }
    }
}

/// A single stored text submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub id: PasteId,
    pub title: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub language: Option<String>,
    pub channel: Option<String>,
    pub annotates: Option<PasteId>,
    pub private: bool,
    pub created: DateTime<Utc>,
}

impl Paste {
    /// A new, unassigned, public top-level paste created now.
    ///
    /// `created` is truncated to whole seconds, the resolution the store keeps.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: PasteId::UNASSIGNED,
            title: None,
            content: content.into(),
            author: None,
            language: None,
            channel: None,
            annotates: None,
            private: false,
            created: Utc::now().trunc_subsecs(0),
        }
    }

    /// Builds a paste from a submitted form.
    ///
    /// Title and author are trimmed; language and channel are taken as-is.
    /// Any field that ends up empty is treated as absent.
    pub fn from_form(form: PasteForm) -> Self {
        let mut paste = Paste::new(form.content);
        paste.title = non_empty(form.title.as_deref().map(str::trim));
        paste.author = non_empty(form.author.as_deref().map(str::trim));
        paste.language = non_empty(form.language.as_deref());
        paste.channel = non_empty(form.channel.as_deref());
        paste.private = form.private;
        paste
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn is_annotation(&self) -> bool {
        self.annotates.is_some()
    }

    /// The thread root: the annotated paste, or this paste if it is top-level.
    pub fn root_id(&self) -> PasteId {
        self.annotates.unwrap_or(self.id)
    }

    /// Makes this paste an annotation in `parent`'s thread.
    ///
    /// Threads are one level deep, so the link always points at the parent's
    /// root. Privacy is inherited from the parent.
    pub fn attach_to(&mut self, parent: &Paste) {
        self.annotates = Some(parent.root_id());
        self.private = parent.private;
    }

    /// Look up a filterable text field by name.
    ///
    /// Returns `None` both for unknown names and for absent values.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => self.title.as_deref(),
            "author" => self.author.as_deref(),
            "language" => self.language.as_deref(),
            "channel" => self.channel.as_deref(),
            _ => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// The submitted-form payload for a new paste or annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasteForm {
    pub content: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub channel: Option<String>,
    pub private: bool,
}

impl PasteForm {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// An annotation together with its 1-based position in the thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadEntry {
    pub ordinal: u32,
    pub paste: Paste,
}

/// A paste plus its annotations in thread order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasteAggregate {
    pub paste: Paste,
    pub annotations: Vec<ThreadEntry>,
}

impl PasteAggregate {
    pub fn annotation(&self, ordinal: u32) -> Option<&ThreadEntry> {
        self.annotations.iter().find(|e| e.ordinal == ordinal)
    }

    /// Each annotation paired with the paste it follows: the root for the
    /// first annotation, the preceding annotation otherwise.
    pub fn entries_with_previous(&self) -> impl Iterator<Item = (&ThreadEntry, &Paste)> + '_ {
        self.annotations.iter().enumerate().map(move |(i, entry)| {
            let previous = match i {
                0 => &self.paste,
                _ => &self.annotations[i - 1].paste,
            };
            (entry, previous)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_id_parse() {
        assert_eq!("42".parse::<PasteId>().unwrap(), PasteId::new(42));
        assert_eq!(" 7 ".parse::<PasteId>().unwrap(), PasteId::new(7));
        assert!(matches!(
            "abc".parse::<PasteId>(),
            Err(PasteError::InvalidPasteId(s)) if s == "abc"
        ));
        assert!("0".parse::<PasteId>().is_err());
        assert!("-3".parse::<PasteId>().is_err());
        assert!("".parse::<PasteId>().is_err());
    }

    #[test]
    fn test_paste_id_ranges() {
        assert!(!PasteId::UNASSIGNED.is_assigned());
        assert!(PasteId::new(1).is_assigned());
        assert!(!PasteId::new(PRIVATE_ID_BASE - 1).in_private_range());
        assert!(PasteId::new(PRIVATE_ID_BASE).in_private_range());
        assert!(PasteId::new(i64::MAX).in_private_range());
    }

    #[test]
    fn test_from_form_trims_and_drops_empty() {
        let form = PasteForm {
            content: "  body  ".into(),
            title: Some("  My Title ".into()),
            author: Some("   ".into()),
            language: Some("".into()),
            channel: Some(" #rust".into()),
            private: true,
        };
        let paste = Paste::from_form(form);

        assert_eq!(paste.id, PasteId::UNASSIGNED);
        assert_eq!(paste.content, "  body  ");
        assert_eq!(paste.title.as_deref(), Some("My Title"));
        assert_eq!(paste.author, None);
        assert_eq!(paste.language, None);
        assert_eq!(paste.channel.as_deref(), Some(" #rust"));
        assert!(paste.private);
        assert!(!paste.is_annotation());
    }

    #[test]
    fn test_root_id() {
        let mut root = Paste::new("root");
        root.id = PasteId::new(5);
        assert_eq!(root.root_id(), PasteId::new(5));

        let mut reply = Paste::new("reply");
        reply.id = PasteId::new(9);
        reply.attach_to(&root);
        assert_eq!(reply.root_id(), PasteId::new(5));
    }

    #[test]
    fn test_attach_to_annotation_flattens_to_root() {
        let mut root = Paste::new("root").with_private(true);
        root.id = PasteId::new(PRIVATE_ID_BASE + 10);

        let mut first = Paste::new("first");
        first.id = PasteId::new(PRIVATE_ID_BASE + 20);
        first.attach_to(&root);

        let mut second = Paste::new("second");
        second.attach_to(&first);

        assert_eq!(second.annotates, Some(root.id));
        assert!(second.private);
    }

    #[test]
    fn test_field_lookup() {
        let paste = Paste::new("x").with_author("alice").with_language("rust");
        assert_eq!(paste.field("author"), Some("alice"));
        assert_eq!(paste.field("language"), Some("rust"));
        assert_eq!(paste.field("channel"), None);
        assert_eq!(paste.field("flavour"), None);
    }

    #[test]
    fn test_entries_with_previous() {
        let mut root = Paste::new("v1");
        root.id = PasteId::new(1);
        let entries: Vec<ThreadEntry> = (2..=4)
            .enumerate()
            .map(|(i, id)| {
                let mut p = Paste::new(format!("v{}", id));
                p.id = PasteId::new(id);
                p.attach_to(&root);
                ThreadEntry {
                    ordinal: i as u32 + 1,
                    paste: p,
                }
            })
            .collect();
        let aggregate = PasteAggregate {
            paste: root,
            annotations: entries,
        };

        let pairs: Vec<(u32, PasteId)> = aggregate
            .entries_with_previous()
            .map(|(e, prev)| (e.ordinal, prev.id))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (1, PasteId::new(1)),
                (2, PasteId::new(2)),
                (3, PasteId::new(3))
            ]
        );
        assert_eq!(aggregate.annotation(2).unwrap().paste.content, "v3");
        assert!(aggregate.annotation(4).is_none());
    }

    #[test]
    fn test_paste_serialization_roundtrip() {
        let mut paste = Paste::new("content").with_title("T").with_channel("#go");
        paste.id = PasteId::new(12);
        paste.annotates = Some(PasteId::new(3));

        let json = serde_json::to_string(&paste).unwrap();
        assert!(json.contains("\"id\":12"));
        let loaded: Paste = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, paste);
    }

    #[test]
    fn test_form_deserializes_with_missing_fields() {
        let form: PasteForm = serde_json::from_str(r#"{"content": "hi"}"#).unwrap();
        assert_eq!(form, PasteForm::new("hi"));
    }
}
