//! Circulation error taxonomy
//!
//! Business-rule violations (`Duplicate` through `BorrowerMismatch`) always
//! leave engine state untouched; `Store` and `Backup` mean the operation was
//! not committed.

use thiserror::Error;

use crate::domain::{MemberId, ValidationError};
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("book '{title}' by {author} is already in the catalog")]
    Duplicate { title: String, author: String },

    #[error("book '{title}' by {author} not found")]
    BookNotFound { title: String, author: String },

    #[error("member '{0}' not found")]
    MemberNotFound(String),

    #[error("several members are named '{0}'; use a member id instead")]
    AmbiguousMember(String),

    #[error("book '{title}' is already issued")]
    NotAvailable { title: String },

    #[error("book '{title}' is not currently issued")]
    NotIssued { title: String },

    #[error("book '{title}' was issued to {holder}, not {returner}")]
    BorrowerMismatch {
        title: String,
        holder: MemberId,
        returner: MemberId,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("backup snapshot failed: {0}")]
    Backup(String),
}

impl EngineError {
    /// True when the persisted data itself is unreadable
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_corruption())
    }
}
