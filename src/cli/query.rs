//! Query commands (status, overdue, ledger)

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use super::output::Output;
use crate::engine::CirculationEngine;
use crate::storage::Library;

/// Show catalog and roster counts
pub fn status(output: &Output) -> Result<()> {
    let library = Library::open_current()?;
    let engine = CirculationEngine::load(&library)?;

    let stats = engine.statistics();

    if output.is_json() {
        output.data(&stats);
    } else {
        println!("Library Status");
        println!("{}", "=".repeat(40));
        println!();
        println!("Books: {} total", stats.total_books);
        println!("  On shelf:  {}", stats.available);
        println!("  On loan:   {}", stats.issued);
        println!();
        println!("Members:    {}", stats.total_members);
        println!("Categories: {}", stats.categories);
    }

    Ok(())
}

/// Show overdue loans as of now or a given date
pub fn overdue(output: &Output, as_of: Option<&str>) -> Result<()> {
    let library = Library::open_current()?;
    let engine = CirculationEngine::load(&library)?;

    let as_of = match as_of {
        Some(raw) => parse_as_of(raw)?,
        None => Utc::now(),
    };
    output.verbose_ctx("overdue", &format!("Reference time: {}", as_of));

    let report = engine.list_overdue(as_of);

    if output.is_json() {
        let items: Vec<_> = report
            .iter()
            .map(|o| {
                serde_json::json!({
                    "title": o.book.title,
                    "author": o.book.author,
                    "member_id": o.member_id.to_string(),
                    "member_name": o.member_name,
                    "due_date": o.book.due_date,
                    "days_overdue": o.days_overdue,
                })
            })
            .collect();
        output.data(&items);
    } else if report.is_empty() {
        println!("No overdue books.");
    } else {
        println!("Overdue books ({}):", report.len());
        println!("{:<30} {:<20} {:<10} DAYS LATE", "TITLE", "BORROWER", "DUE");
        println!("{}", "-".repeat(76));
        for entry in &report {
            let due = entry
                .book
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            println!(
                "{:<30} {:<20} {:<10} {}",
                entry.book.title,
                format!("{} ({})", entry.member_name, entry.member_id),
                due,
                entry.days_overdue
            );
        }
    }

    Ok(())
}

/// Show recent ledger entries
pub fn ledger(output: &Output, limit: Option<usize>) -> Result<()> {
    let library = Library::open_current()?;
    let engine = CirculationEngine::load(&library)?;

    let entries = engine.ledger_entries(limit)?;

    if output.is_json() {
        output.data(&entries);
    } else if entries.is_empty() {
        println!("No transactions recorded.");
    } else {
        println!("{:<22} {:<8} {:<30} MEMBER", "TIMESTAMP", "EVENT", "TITLE");
        println!("{}", "-".repeat(74));
        for entry in &entries {
            println!(
                "{:<22} {:<8} {:<30} {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                entry.event.label(),
                entry.title,
                entry.member_id
            );
        }
    }

    Ok(())
}

/// `--as-of` takes a plain date; overdue checks run against its midnight UTC
fn parse_as_of(raw: &str) -> Result<DateTime<Utc>> {
    let date: NaiveDate = raw
        .parse()
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("Invalid time of day")?;
    Ok(midnight.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_as_of_accepts_iso_dates() {
        let parsed = parse_as_of("2026-08-07").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-08-07T00:00:00+00:00");
    }

    #[test]
    fn parse_as_of_rejects_garbage() {
        assert!(parse_as_of("yesterday").is_err());
        assert!(parse_as_of("2026-13-01").is_err());
    }
}
