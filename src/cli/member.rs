//! Member CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::engine::{CirculationEngine, MemberRef};
use crate::storage::Library;

#[derive(Subcommand)]
pub enum MemberCommands {
    /// Register a member and allocate an id
    Add {
        /// Member name (need not be unique; ids are the identity)
        name: String,
    },

    /// List all members
    List,

    /// Show a member's record and current loans
    Show {
        /// Member id (M0001) or name
        member: String,
    },
}

pub fn run(cmd: MemberCommands, output: &Output) -> Result<()> {
    match cmd {
        MemberCommands::Add { name } => add_member(output, &name),
        MemberCommands::List => list_members(output),
        MemberCommands::Show { member } => show_member(output, &member),
    }
}

fn engine() -> Result<CirculationEngine> {
    let library = Library::open_current()?;
    Ok(CirculationEngine::load(&library)?)
}

fn add_member(output: &Output, name: &str) -> Result<()> {
    let engine = engine()?;
    let member = engine.add_member(name)?;

    if output.is_json() {
        output.data(&member);
    } else {
        output.success(&format!("Added member: {} ({})", member.name, member.id));
    }

    Ok(())
}

fn list_members(output: &Output) -> Result<()> {
    let engine = engine()?;
    let members = engine.members();

    if output.is_json() {
        output.data(&members);
    } else if members.is_empty() {
        println!("No members registered");
    } else {
        println!("{:<8} {:<24} LOANS", "ID", "NAME");
        println!("{}", "-".repeat(48));
        for member in &members {
            println!("{:<8} {:<24} {}", member.id.to_string(), member.name, member.loans.len());
        }
    }

    Ok(())
}

fn show_member(output: &Output, member_str: &str) -> Result<()> {
    let engine = engine()?;
    let member = engine.member_loans(&MemberRef::parse(member_str))?;

    if output.is_json() {
        output.data(&member);
    } else {
        println!("Member: {} ({})", member.name, member.id);

        if member.loans.is_empty() {
            println!("No books checked out");
        } else {
            println!();
            println!("{:<30} {:<20} DUE", "TITLE", "AUTHOR");
            println!("{}", "-".repeat(64));
            for loan in &member.loans {
                println!(
                    "{:<30} {:<20} {}",
                    loan.title,
                    loan.author,
                    loan.due_date.format("%Y-%m-%d")
                );
            }
        }
    }

    Ok(())
}
