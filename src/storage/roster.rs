//! JSONL storage for the member roster
//!
//! Same contract as the catalog store: missing file means empty roster, a
//! bad record fails the whole load, writes are temp-file + rename.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::error::StoreError;
use crate::domain::{Member, MemberId};

/// Store for the member roster in JSONL format
#[derive(Debug)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    /// Creates a roster store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole roster
    pub fn load(&self) -> Result<BTreeMap<MemberId, Member>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path)
            .map_err(|e| StoreError::io(&self.path, "open", e))?;

        file.lock_shared()
            .map_err(|e| StoreError::io(&self.path, "lock", e))?;

        let reader = BufReader::new(&file);
        let mut members = BTreeMap::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_num = idx + 1;
            let line = line.map_err(|e| StoreError::io(&self.path, "read", e))?;

            if line.trim().is_empty() {
                continue;
            }

            let member: Member = serde_json::from_str(&line)
                .map_err(|e| StoreError::corrupt(&self.path, line_num, e.to_string()))?;

            if member.name.trim().is_empty() {
                return Err(StoreError::corrupt(&self.path, line_num, "blank member name"));
            }

            let id = member.id.clone();
            if members.insert(id, member).is_some() {
                return Err(StoreError::corrupt(
                    &self.path,
                    line_num,
                    "duplicate member id",
                ));
            }
        }

        Ok(members)
    }

    /// Writes the whole roster (full rewrite), sorted by member id
    pub fn save(&self, members: &BTreeMap<MemberId, Member>) -> Result<(), StoreError> {
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

            for member in members.values() {
                let line = serde_json::to_string(member)
                    .map_err(|e| StoreError::corrupt(&temp_path, 0, e.to_string()))?;
                writeln!(writer, "{}", line)
                    .map_err(|e| StoreError::io(&temp_path, "write", e))?;
            }

            writer
                .flush()
                .map_err(|e| StoreError::io(&temp_path, "flush", e))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::io(&self.path, "rename", e))?;

        Ok(())
    }
}
