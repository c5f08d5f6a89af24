//! Book CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::Book;
use crate::engine::{CirculationEngine, SearchMode};
use crate::storage::Library;

#[derive(Subcommand)]
pub enum BookCommands {
    /// Add a book to the catalog
    Add {
        /// Book title
        title: String,

        /// Book author
        author: String,

        /// Shelving category (defaults to "General")
        #[arg(long)]
        category: Option<String>,
    },

    /// List books (all, by category, or by availability)
    List {
        /// Only books in this category (case-insensitive exact match)
        #[arg(long)]
        category: Option<String>,

        /// Only books currently on the shelf
        #[arg(long, conflicts_with = "issued")]
        available: bool,

        /// Only books currently out on loan
        #[arg(long)]
        issued: bool,
    },

    /// Search books by title and/or author substring
    Search {
        /// Search query (empty matches nothing)
        query: String,

        /// Which fields to match
        #[arg(long, value_enum, default_value = "both")]
        by: SearchBy,
    },

    /// Remove a book from the catalog (must not be on loan)
    Remove {
        /// Book title
        title: String,

        /// Book author
        author: String,
    },
}

/// Which fields `book search` matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchBy {
    Title,
    Author,
    Both,
}

impl From<SearchBy> for SearchMode {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Title => SearchMode::Title,
            SearchBy::Author => SearchMode::Author,
            SearchBy::Both => SearchMode::Both,
        }
    }
}

pub fn run(cmd: BookCommands, output: &Output) -> Result<()> {
    match cmd {
        BookCommands::Add {
            title,
            author,
            category,
        } => add_book(output, &title, &author, category.as_deref()),
        BookCommands::List {
            category,
            available,
            issued,
        } => list_books(output, category.as_deref(), available, issued),
        BookCommands::Search { query, by } => search_books(output, &query, by),
        BookCommands::Remove { title, author } => remove_book(output, &title, &author),
    }
}

fn engine() -> Result<CirculationEngine> {
    let library = Library::open_current()?;
    Ok(CirculationEngine::load(&library)?)
}

fn add_book(output: &Output, title: &str, author: &str, category: Option<&str>) -> Result<()> {
    let engine = engine()?;
    let book = engine.add_book(title, author, category)?;

    if output.is_json() {
        output.data(&book);
    } else {
        output.success(&format!(
            "Added book: {} by {} [{}]",
            book.title, book.author, book.category
        ));
    }

    Ok(())
}

fn list_books(
    output: &Output,
    category: Option<&str>,
    available_only: bool,
    issued_only: bool,
) -> Result<()> {
    let engine = engine()?;

    let mut books = match category {
        Some(category) => engine.books_by_category(category),
        None => engine.books(),
    };

    if available_only {
        books.retain(|b| b.available);
    }
    if issued_only {
        books.retain(|b| !b.available);
    }

    if output.is_json() {
        output.data(&books);
    } else if books.is_empty() {
        match category {
            Some(category) => println!("No books in category '{}'", category),
            None => println!("No books in the catalog"),
        }
    } else {
        print_book_table(&books);
    }

    Ok(())
}

fn search_books(output: &Output, query: &str, by: SearchBy) -> Result<()> {
    let engine = engine()?;
    let books = engine.search_books(query, by.into());

    if output.is_json() {
        output.data(&books);
    } else if books.is_empty() {
        println!("No books match '{}'", query);
    } else {
        print_book_table(&books);
        println!();
        println!("Found {} book(s)", books.len());
    }

    Ok(())
}

fn remove_book(output: &Output, title: &str, author: &str) -> Result<()> {
    let engine = engine()?;
    let book = engine.remove_book(title, author)?;

    if output.is_json() {
        output.data(&book);
    } else {
        output.success(&format!("Removed book: {} by {}", book.title, book.author));
    }

    Ok(())
}

fn print_book_table(books: &[Book]) {
    println!("{:<30} {:<20} {:<12} STATUS", "TITLE", "AUTHOR", "CATEGORY");
    println!("{}", "-".repeat(78));

    for book in books {
        let status = if book.available {
            "available".to_string()
        } else {
            match (&book.borrowed_by, &book.due_date) {
                (Some(member), Some(due)) => {
                    format!("due {} ({})", due.format("%Y-%m-%d"), member)
                }
                _ => "issued".to_string(),
            }
        };
        println!(
            "{:<30} {:<20} {:<12} {}",
            book.title, book.author, book.category, status
        );
    }
}
