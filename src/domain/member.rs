//! Member domain model
//!
//! A member's `loans` list mirrors the catalog: every entry corresponds to a
//! book whose `borrowed_by` points back at this member. The circulation
//! engine mutates both sides inside one guarded section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{BookKey, MemberId};
use super::ValidationError;

/// One checked-out book on a member's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Title of the borrowed book
    pub title: String,

    /// Author of the borrowed book
    pub author: String,

    /// When the loan is due back
    pub due_date: DateTime<Utc>,
}

impl Loan {
    pub fn new(title: impl Into<String>, author: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            due_date,
        }
    }

    /// Key of the book this loan refers to
    pub fn key(&self) -> BookKey {
        BookKey::new(&self.title, &self.author)
    }
}

/// A library member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier, stable for the roster's lifetime
    pub id: MemberId,

    /// Display name (trimmed, non-empty); names need not be unique
    pub name: String,

    /// Currently borrowed books, in borrow order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loans: Vec<Loan>,
}

impl Member {
    /// Creates a member with no loans
    pub fn new(id: MemberId, name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.to_string(),
            loans: Vec::new(),
        })
    }

    /// True if the member currently holds the given book
    pub fn has_loan(&self, key: &BookKey) -> bool {
        self.loans.iter().any(|l| &l.key() == key)
    }

    /// Records a loan at the end of the borrow list
    pub fn add_loan(&mut self, loan: Loan) {
        self.loans.push(loan);
    }

    /// Removes and returns the loan for the given book, if held
    pub fn remove_loan(&mut self, key: &BookKey) -> Option<Loan> {
        let pos = self.loans.iter().position(|l| &l.key() == key)?;
        Some(self.loans.remove(pos))
    }

    /// Case-insensitive name comparison for lookups
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn alice() -> Member {
        Member::new(MemberId::first(), "Alice").unwrap()
    }

    fn loan(title: &str, author: &str) -> Loan {
        Loan::new(title, author, Utc::now() + Duration::days(14))
    }

    #[test]
    fn new_member_has_no_loans() {
        let member = alice();
        assert_eq!(member.id.to_string(), "M0001");
        assert_eq!(member.name, "Alice");
        assert!(member.loans.is_empty());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            Member::new(MemberId::first(), "  "),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn name_is_trimmed() {
        let member = Member::new(MemberId::first(), "  Alice ").unwrap();
        assert_eq!(member.name, "Alice");
    }

    #[test]
    fn loans_keep_borrow_order() {
        let mut member = alice();
        member.add_loan(loan("Dune", "Herbert"));
        member.add_loan(loan("Emma", "Austen"));

        let titles: Vec<_> = member.loans.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Emma"]);
    }

    #[test]
    fn remove_loan_by_key() {
        let mut member = alice();
        member.add_loan(loan("Dune", "Herbert"));

        let key = BookKey::new("DUNE", "herbert");
        assert!(member.has_loan(&key));

        let removed = member.remove_loan(&key).unwrap();
        assert_eq!(removed.title, "Dune");
        assert!(!member.has_loan(&key));
        assert!(member.remove_loan(&key).is_none());
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let member = alice();
        assert!(member.name_matches("alice"));
        assert!(member.name_matches(" ALICE "));
        assert!(!member.name_matches("Bob"));
    }

    #[test]
    fn serde_roundtrip() {
        let mut member = alice();
        member.add_loan(loan("Dune", "Herbert"));

        let json = serde_json::to_string(&member).unwrap();
        let parsed: Member = serde_json::from_str(&json).unwrap();
        assert_eq!(member, parsed);
    }

    #[test]
    fn empty_loans_are_omitted_in_json() {
        let json = serde_json::to_string(&alice()).unwrap();
        assert!(!json.contains("loans"));
    }
}
