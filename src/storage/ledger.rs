//! Append-only transaction ledger
//!
//! Every issue and return appends one JSON line to `.biblio/ledger.jsonl`.
//! Entries are never rewritten; the ledger is an audit trail, not the
//! system of record (the catalog and roster files are authoritative).

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use crate::domain::MemberId;

/// Kind of circulation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    Issue,
    Return,
}

impl LedgerEvent {
    /// Display label for text output
    pub fn label(&self) -> &'static str {
        match self {
            LedgerEvent::Issue => "issue",
            LedgerEvent::Return => "return",
        }
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// When the event was recorded
    pub timestamp: DateTime<Utc>,

    /// Issue or return
    pub event: LedgerEvent,

    /// Title of the book involved
    pub title: String,

    /// Author of the book involved
    pub author: String,

    /// Member involved
    pub member_id: MemberId,

    /// Due date of the new loan (issue events only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Builds an issue record stamped with the current time
    pub fn issue(
        title: impl Into<String>,
        author: impl Into<String>,
        member_id: MemberId,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event: LedgerEvent::Issue,
            title: title.into(),
            author: author.into(),
            member_id,
            due_date: Some(due_date),
        }
    }

    /// Builds a return record stamped with the current time
    pub fn giveback(
        title: impl Into<String>,
        author: impl Into<String>,
        member_id: MemberId,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event: LedgerEvent::Return,
            title: title.into(),
            author: author.into(),
            member_id,
            due_date: None,
        }
    }
}

/// Store for the append-only ledger file
#[derive(Debug)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Creates a ledger store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry; prior lines are never touched
    pub fn append(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, "create dir", e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, "open", e))?;

        file.lock_exclusive()
            .map_err(|e| StoreError::io(&self.path, "lock", e))?;

        let mut writer = BufWriter::new(&file);
        let line = serde_json::to_string(entry)
            .map_err(|e| StoreError::corrupt(&self.path, 0, e.to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| StoreError::io(&self.path, "write", e))?;

        writer
            .flush()
            .map_err(|e| StoreError::io(&self.path, "flush", e))?;

        Ok(())
    }

    /// Reads entries in recorded order, most recent last
    ///
    /// `limit` keeps only the newest N. An unparsable line is corruption —
    /// an audit trail that silently drops records is worse than one that
    /// refuses to load.
    pub fn read(&self, limit: Option<usize>) -> Result<Vec<LedgerEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| StoreError::io(&self.path, "open", e))?;

        file.lock_shared()
            .map_err(|e| StoreError::io(&self.path, "lock", e))?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_num = idx + 1;
            let line = line.map_err(|e| StoreError::io(&self.path, "read", e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LedgerEntry = serde_json::from_str(&line)
                .map_err(|e| StoreError::corrupt(&self.path, line_num, e.to_string()))?;
            entries.push(entry);
        }

        if let Some(limit) = limit {
            if entries.len() > limit {
                entries.drain(..entries.len() - limit);
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LedgerStore {
        LedgerStore::new(dir.path().join("ledger.jsonl"))
    }

    fn issue_entry(title: &str) -> LedgerEntry {
        LedgerEntry::issue(title, "Herbert", MemberId::first(), Utc::now() + Duration::days(14))
    }

    #[test]
    fn read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).read(None).unwrap().is_empty());
    }

    #[test]
    fn append_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(&issue_entry("Dune")).unwrap();
        store
            .append(&LedgerEntry::giveback("Dune", "Herbert", MemberId::first()))
            .unwrap();

        let entries = store.read(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, LedgerEvent::Issue);
        assert_eq!(entries[1].event, LedgerEvent::Return);
        assert!(entries[1].due_date.is_none());
    }

    #[test]
    fn append_never_rewrites_prior_entries() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(&issue_entry("Dune")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        store.append(&issue_entry("Emma")).unwrap();
        let after = fs::read_to_string(store.path()).unwrap();

        assert!(after.starts_with(&before));
    }

    #[test]
    fn limit_keeps_newest_entries() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        for title in ["A", "B", "C", "D"] {
            store.append(&issue_entry(title)).unwrap();
        }

        let entries = store.read(Some(2)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "C");
        assert_eq!(entries[1].title, "D");
    }

    #[test]
    fn unparsable_line_is_corruption() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(&issue_entry("Dune")).unwrap();
        let mut content = fs::read_to_string(store.path()).unwrap();
        content.push_str("garbage\n");
        fs::write(store.path(), content).unwrap();

        assert!(store.read(None).unwrap_err().is_corruption());
    }
}
