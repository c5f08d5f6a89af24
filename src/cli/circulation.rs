//! Issue and return commands

use anyhow::Result;

use super::output::Output;
use crate::engine::{CirculationEngine, MemberRef};
use crate::storage::Library;

pub fn issue(output: &Output, title: &str, author: &str, member_str: &str) -> Result<()> {
    let library = Library::open_current()?;
    let engine = CirculationEngine::load(&library)?;

    let who = MemberRef::parse(member_str);
    let outcome = engine.issue_book(title, author, &who)?;

    if let Some(warning) = &outcome.ledger_warning {
        output.warn(&format!("ledger entry not recorded: {}", warning));
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "title": title,
            "author": author,
            "member_id": outcome.member_id.to_string(),
            "due_date": outcome.due_date,
        }));
    } else {
        output.success(&format!(
            "Issued '{}' to {}, due {}",
            title,
            outcome.member_id,
            outcome.due_date.format("%Y-%m-%d")
        ));
    }

    Ok(())
}

pub fn giveback(output: &Output, title: &str, author: &str, member_str: &str) -> Result<()> {
    let library = Library::open_current()?;
    let engine = CirculationEngine::load(&library)?;

    let who = MemberRef::parse(member_str);
    let outcome = engine.return_book(title, author, &who)?;

    if let Some(warning) = &outcome.ledger_warning {
        output.warn(&format!("ledger entry not recorded: {}", warning));
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "title": title,
            "author": author,
            "member_id": outcome.member_id.to_string(),
        }));
    } else {
        output.success(&format!("Returned '{}' from {}", title, outcome.member_id));
    }

    Ok(())
}
