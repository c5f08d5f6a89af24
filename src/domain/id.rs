//! Identity types for books and members
//!
//! ID Format:
//! - Member IDs: `M{4-digit counter}` (e.g., `M0001`), widening past `M9999`
//! - Books have no synthetic ID; their natural key is the case-folded
//!   (title, author) pair
//!
//! Member IDs are allocated as max-existing + 1, so they stay unique for the
//! lifetime of a roster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid member ID format: expected 'M{{number}}', got '{0}'")]
    InvalidMemberId(String),
}

/// Member ID in the format `M{4-digit counter}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(u32);

impl MemberId {
    /// Creates a member ID from a raw counter value
    pub fn new(counter: u32) -> Self {
        Self(counter)
    }

    /// First ID handed out on an empty roster
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the ID that follows this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value
    pub fn counter(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{:04}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix('M')
            .ok_or_else(|| IdError::InvalidMemberId(s.to_string()))?;

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdError::InvalidMemberId(s.to_string()));
        }

        let counter: u32 = digits
            .parse()
            .map_err(|_| IdError::InvalidMemberId(s.to_string()))?;

        if counter == 0 {
            return Err(IdError::InvalidMemberId(s.to_string()));
        }

        Ok(Self(counter))
    }
}

impl TryFrom<String> for MemberId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.to_string()
    }
}

/// Natural key of a book: the case-folded (title, author) pair
///
/// Lookups and duplicate detection are case-insensitive, so `"Dune"` and
/// `"dune"` address the same catalog entry. The display casing lives on the
/// [`Book`](super::Book) itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookKey {
    title: String,
    author: String,
}

impl BookKey {
    /// Creates a key from raw title and author text
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.trim().to_lowercase(),
            author: author.trim().to_lowercase(),
        }
    }

    /// Returns the folded title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the folded author
    pub fn author(&self) -> &str {
        &self.author
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_format_is_zero_padded() {
        assert_eq!(MemberId::new(1).to_string(), "M0001");
        assert_eq!(MemberId::new(42).to_string(), "M0042");
        assert_eq!(MemberId::new(9999).to_string(), "M9999");
    }

    #[test]
    fn member_id_widens_past_four_digits() {
        assert_eq!(MemberId::new(10000).to_string(), "M10000");
    }

    #[test]
    fn member_id_parses_correctly() {
        let id: MemberId = "M0001".parse().unwrap();
        assert_eq!(id, MemberId::first());

        let id: MemberId = "M0042".parse().unwrap();
        assert_eq!(id.counter(), 42);
    }

    #[test]
    fn member_id_rejects_invalid_format() {
        assert!("".parse::<MemberId>().is_err());
        assert!("0001".parse::<MemberId>().is_err());
        assert!("M".parse::<MemberId>().is_err());
        assert!("M00x1".parse::<MemberId>().is_err());
        assert!("M0000".parse::<MemberId>().is_err()); // counter starts at 1
        assert!("m0001".parse::<MemberId>().is_err());
    }

    #[test]
    fn member_id_next_is_monotonic() {
        let id = MemberId::first();
        assert_eq!(id.next(), MemberId::new(2));
        assert!(id.next() > id);
    }

    #[test]
    fn serde_roundtrip_member_id() {
        let original = MemberId::new(7);
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, "\"M0007\"");

        let parsed: MemberId = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn book_key_is_case_insensitive() {
        let a = BookKey::new("Dune", "Herbert");
        let b = BookKey::new("DUNE", "herbert");
        assert_eq!(a, b);
    }

    #[test]
    fn book_key_trims_whitespace() {
        let a = BookKey::new("  Dune ", "Herbert");
        let b = BookKey::new("Dune", " Herbert  ");
        assert_eq!(a, b);
    }

    #[test]
    fn book_key_distinguishes_authors() {
        let a = BookKey::new("Collected Stories", "Borges");
        let b = BookKey::new("Collected Stories", "Carver");
        assert_ne!(a, b);
    }
}
