//! Book domain model
//!
//! A book is either on the shelf (`available`, no borrower, no due date) or
//! out on loan (`!available`, borrower and due date set). Those three fields
//! move together; [`Book::issue`] and [`Book::give_back`] are the only
//! transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BookKey, MemberId};
use super::ValidationError;

/// Category assigned when none is given
pub const DEFAULT_CATEGORY: &str = "General";

/// A book in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Display title (trimmed, non-empty)
    pub title: String,

    /// Display author (trimmed, non-empty)
    pub author: String,

    /// Shelving category
    pub category: String,

    /// Whether the book is on the shelf
    pub available: bool,

    /// Member currently holding the book (set iff not available)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_by: Option<MemberId>,

    /// When the current loan is due (set iff not available)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Book {
    /// Creates an available book with no borrower
    ///
    /// Title and author are trimmed and must be non-empty. A missing or
    /// blank category falls back to `"General"`.
    pub fn new(
        title: &str,
        author: &str,
        category: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        let author = author.trim();

        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if author.is_empty() {
            return Err(ValidationError::EmptyAuthor);
        }

        let category = match category.map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        };

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            category,
            available: true,
            borrowed_by: None,
            due_date: None,
        })
    }

    /// Returns the natural key for catalog lookups
    pub fn key(&self) -> BookKey {
        BookKey::new(&self.title, &self.author)
    }

    /// Transitions the book onto loan
    ///
    /// Caller is responsible for rejecting an already-issued book first.
    pub fn issue(&mut self, member: MemberId, due_date: DateTime<Utc>) {
        self.available = false;
        self.borrowed_by = Some(member);
        self.due_date = Some(due_date);
    }

    /// Transitions the book back onto the shelf
    pub fn give_back(&mut self) {
        self.available = true;
        self.borrowed_by = None;
        self.due_date = None;
    }

    /// True when the loan-state fields agree with each other
    ///
    /// Checked at load time; a record that fails this is corrupt.
    pub fn loan_state_consistent(&self) -> bool {
        if self.available {
            self.borrowed_by.is_none() && self.due_date.is_none()
        } else {
            self.borrowed_by.is_some() && self.due_date.is_some()
        }
    }

    /// True when the book is issued and past due as of the given instant
    pub fn is_overdue(&self, as_of: DateTime<Utc>) -> bool {
        self.due_date.map(|due| as_of > due).unwrap_or(false)
    }

    /// Whole days overdue, rounded up, as of the given instant
    ///
    /// One second past due counts as 1 day; returns `None` for books that
    /// are not overdue (including all available books).
    pub fn days_overdue(&self, as_of: DateTime<Utc>) -> Option<i64> {
        let due = self.due_date?;
        let late = (as_of - due).num_seconds();
        if late <= 0 {
            return None;
        }
        Some((late + 86_399) / 86_400)
    }

    /// Case-insensitive exact match on category
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category.trim())
    }
}
