//! Domain models for Biblio
//!
//! Contains the core entity model without any I/O concerns.

mod id;
mod book;
mod member;

pub use id::{BookKey, IdError, MemberId};
pub use book::Book;
pub use member::{Loan, Member};

use thiserror::Error;

/// Errors from entity construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("book title cannot be empty")]
    EmptyTitle,

    #[error("book author cannot be empty")]
    EmptyAuthor,

    #[error("member name cannot be empty")]
    EmptyName,
}
