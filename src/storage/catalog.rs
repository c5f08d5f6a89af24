//! JSONL storage for the book catalog
//!
//! Books are stored in `.biblio/catalog.jsonl` with one JSON object per
//! line. Uses file locking for concurrent access safety; writes go through
//! a temp file and an atomic rename so a crash mid-write never leaves a
//! half-written catalog behind.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::error::StoreError;
use crate::domain::{Book, BookKey};

/// Store for the book catalog in JSONL format
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Creates a catalog store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole catalog
    ///
    /// A missing file is an empty catalog. Any unparsable line, schema
    /// violation, or duplicate key fails the entire load with
    /// [`StoreError::Corrupt`]; a partially-parsed catalog is never
    /// returned.
    pub fn load(&self) -> Result<BTreeMap<BookKey, Book>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| StoreError::io(&self.path, "open", e))?;

        // Shared lock for reading
        file.lock_shared()
            .map_err(|e| StoreError::io(&self.path, "lock", e))?;

        let reader = BufReader::new(&file);
        let mut books = BTreeMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_num = idx + 1;
            let line = line.map_err(|e| StoreError::io(&self.path, "read", e))?;

            if line.trim().is_empty() {
                continue;
            }

            let book: Book = serde_json::from_str(&line)
                .map_err(|e| StoreError::corrupt(&self.path, line_num, e.to_string()))?;

            if book.title.trim().is_empty() || book.author.trim().is_empty() {
                return Err(StoreError::corrupt(
                    &self.path,
                    line_num,
                    "blank title or author",
                ));
            }

            if !book.loan_state_consistent() {
                return Err(StoreError::corrupt(
                    &self.path,
                    line_num,
                    "availability disagrees with borrower/due date",
                ));
            }

            let key = book.key();
            if books.insert(key, book).is_some() {
                return Err(StoreError::corrupt(
                    &self.path,
                    line_num,
                    "duplicate title+author entry",
                ));
            }
        }

        // Lock is released when file is dropped
        Ok(books)
    }

    /// Writes the whole catalog (full rewrite)
    ///
    /// Records land sorted by key so the file diffs cleanly.
    pub fn save(&self, books: &BTreeMap<BookKey, Book>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, "create dir", e))?;
        }

        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| StoreError::io(&temp_path, "create", e))?;

            file.lock_exclusive()
                .map_err(|e| StoreError::io(&temp_path, "lock", e))?;

            let mut writer = BufWriter::new(&file);

            for book in books.values() {
                let line = serde_json::to_string(book)
                    .map_err(|e| StoreError::corrupt(&temp_path, 0, e.to_string()))?;
                writeln!(writer, "{}", line)
                    .map_err(|e| StoreError::io(&temp_path, "write", e))?;
            }

            writer
                .flush()
                .map_err(|e| StoreError::io(&temp_path, "flush", e))?;
        }

        // Atomic swap
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::io(&self.path, "rename", e))?;

        Ok(())
    }
}
