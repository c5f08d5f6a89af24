//! Biblio - A local-first library circulation CLI
//!
//! Biblio tracks a catalog of books and a roster of members, records
//! issue/return events with due-date enforcement, and keeps an append-only
//! transaction ledger in plain files under `.biblio/`.

pub mod domain;
pub mod engine;
pub mod storage;
pub mod cli;

pub use domain::{Book, BookKey, Loan, Member, MemberId};
pub use engine::{CirculationEngine, EngineError, MemberRef, SearchMode};
