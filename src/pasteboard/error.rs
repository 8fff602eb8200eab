//! Error types for pasteboard.
//!
//! Every fallible operation returns [`Result`]. Variants that describe bad
//! caller input report `true` from [`PasteError::is_caller_fault`].

use crate::model::PasteId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasteError {
    #[error("paste {0} not found")]
    PasteNotFound(PasteId),

    #[error("invalid paste id '{0}'")]
    InvalidPasteId(String),

    #[error("invalid page number: {0}")]
    InvalidPageNumber(String),

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("invalid browse arguments: {0}")]
    InvalidBrowseArgs(String),

    #[error("paste {0} is not an annotation")]
    NotAnnotation(PasteId),

    #[error("paste id {0} is outside the id range for its visibility")]
    IdOutOfRange(PasteId),

    #[error("could not allocate an unused private paste id")]
    IdSpaceExhausted,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl PasteError {
    /// True for errors caused by malformed caller input rather than storage.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            PasteError::InvalidPasteId(_)
                | PasteError::InvalidPageNumber(_)
                | PasteError::InvalidPageSize
                | PasteError::InvalidBrowseArgs(_)
                | PasteError::NotAnnotation(_)
                | PasteError::IdOutOfRange(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PasteError>;
