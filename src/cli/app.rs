//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{backup_cmd, book, circulation, member, query};
use crate::storage::{Library, StoreError};

#[derive(Parser)]
#[command(name = "biblio")]
#[command(author, version, about = "Local-first library circulation management")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new library
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Manage the book catalog
    #[command(subcommand)]
    Book(book::BookCommands),

    /// Manage the member roster
    #[command(subcommand)]
    Member(member::MemberCommands),

    /// Issue a book to a member
    Issue {
        /// Book title
        title: String,

        /// Book author
        author: String,

        /// Member id (M0001) or name
        member: String,
    },

    /// Return a book from the member who borrowed it
    Return {
        /// Book title
        title: String,

        /// Book author
        author: String,

        /// Member id (M0001) or name
        member: String,
    },

    /// Show overdue loans
    Overdue {
        /// Reference date (YYYY-MM-DD; defaults to now)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Show catalog and roster counts
    Status,

    /// Show the transaction ledger
    Ledger {
        /// Only the most recent N entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage backups of the data files
    #[command(subcommand)]
    Backup(backup_cmd::BackupCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("Biblio starting");

    let result = dispatch(cli.command, &output);

    if let Err(e) = &result {
        // A corrupt data file needs an operator decision, not a retry
        if e.chain()
            .any(|c| matches!(c.downcast_ref::<StoreError>(), Some(s) if s.is_corruption()))
        {
            output.warn("Data file is corrupt. Run 'biblio backup restore' to recover the most recent backup, or delete the file to start empty.");
        }
    }

    result
}

fn dispatch(command: Commands, output: &Output) -> Result<()> {
    match command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing library at: {}", path));
            let library = Library::init(&path)?;
            output.success(&format!(
                "Initialized biblio library at {}",
                library.root().display()
            ));
        }

        Commands::Book(cmd) => book::run(cmd, output)?,
        Commands::Member(cmd) => member::run(cmd, output)?,

        Commands::Issue {
            title,
            author,
            member,
        } => circulation::issue(output, &title, &author, &member)?,

        Commands::Return {
            title,
            author,
            member,
        } => circulation::giveback(output, &title, &author, &member)?,

        Commands::Overdue { as_of } => {
            output.verbose_ctx("overdue", &format!("Reference date: {:?}", as_of));
            query::overdue(output, as_of.as_deref())?
        }

        Commands::Status => {
            output.verbose("Gathering library status");
            query::status(output)?
        }

        Commands::Ledger { limit } => query::ledger(output, limit)?,

        Commands::Backup(cmd) => backup_cmd::run(cmd, output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
