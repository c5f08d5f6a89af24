//! Circulation engine
//!
//! The business-logic layer: issue/return state machine, catalog queries,
//! and the single guarded section that keeps the in-memory collections and
//! their on-disk files in step.

mod error;
mod circulation;

pub use error::EngineError;
pub use circulation::{
    CirculationEngine, IssueOutcome, MemberRef, OverdueLoan, ReturnOutcome, SearchMode, Statistics,
};
