//! Timestamped backups of the data files
//!
//! Each backup is a directory `backups/<label>-<UTC stamp>/` holding copies
//! of whichever data files existed at the time. Restore copies them back;
//! `prune` keeps the newest N directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::Utc;

/// Manages the backup directory for a set of data files
#[derive(Debug)]
pub struct BackupManager {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

/// One backup on disk
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// Directory name, e.g. `auto-20260807-153012`
    pub name: String,

    /// Full path of the backup directory
    pub path: PathBuf,

    /// Filesystem mtime, used for newest-first ordering
    pub created: SystemTime,
}

impl BackupManager {
    /// Creates a manager for the given backup directory and data files
    pub fn new(dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }

    /// Returns the backup directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copies the current data files into a new timestamped directory
    ///
    /// Files that do not exist yet are skipped. Returns the backup path.
    pub fn create(&self, label: &str) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%d-%H%M%S%3f");
        let name = format!("{}-{}", label, stamp);
        let backup_path = self.dir.join(&name);

        fs::create_dir_all(&backup_path)
            .with_context(|| format!("Failed to create backup dir: {}", backup_path.display()))?;

        for file in &self.files {
            if !file.is_file() {
                continue;
            }
            let file_name = file
                .file_name()
                .with_context(|| format!("Data file has no name: {}", file.display()))?;
            fs::copy(file, backup_path.join(file_name))
                .with_context(|| format!("Failed to back up {}", file.display()))?;
        }

        Ok(backup_path)
    }

    /// Lists backups, newest first
    pub fn list(&self) -> Result<Vec<BackupInfo>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read backup dir: {}", self.dir.display()))?
        {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }

            let created = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            backups.push(BackupInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
                created,
            });
        }

        // mtimes can collide within a second; the stamped name breaks ties
        backups.sort_by(|a, b| b.created.cmp(&a.created).then(b.name.cmp(&a.name)));
        Ok(backups)
    }

    /// Returns the most recent backup, if any
    pub fn latest(&self) -> Result<Option<BackupInfo>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Copies a backup's files back over the live data files
    pub fn restore(&self, name: &str) -> Result<()> {
        let backup_path = self.dir.join(name);
        if !backup_path.is_dir() {
            anyhow::bail!("No such backup: {}", name);
        }

        for file in &self.files {
            let file_name = match file.file_name() {
                Some(n) => n,
                None => continue,
            };
            let source = backup_path.join(file_name);
            if source.exists() {
                fs::copy(&source, file)
                    .with_context(|| format!("Failed to restore {}", file.display()))?;
            }
        }

        Ok(())
    }

    /// Deletes all but the newest `max` backups
    pub fn prune(&self, max: usize) -> Result<usize> {
        let backups = self.list()?;
        let mut removed = 0;

        for backup in backups.iter().skip(max) {
            fs::remove_dir_all(&backup.path)
                .with_context(|| format!("Failed to remove backup: {}", backup.path.display()))?;
            removed += 1;
        }

        Ok(removed)
    }
}
