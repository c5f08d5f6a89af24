//! Library data-directory management
//!
//! Handles initialization of the `.biblio/` directory and provides access
//! to the individual stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{BackupManager, CatalogStore, Config, LedgerStore, RosterStore};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Not in a biblio library. Run 'biblio init' first.")]
    NotInLibrary,
}

/// A biblio library rooted at a directory containing `.biblio/`
pub struct Library {
    root: PathBuf,
    config: Config,
}

impl Library {
    /// Opens an existing library at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let biblio_dir = root.join(".biblio");

        if !biblio_dir.is_dir() {
            return Err(LibraryError::NotInLibrary.into());
        }

        let config = Config::for_library(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the library at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_library_root().ok_or(LibraryError::NotInLibrary)?;

        Self::open(root)
    }

    /// Initializes a new library at the given path; idempotent
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let biblio_dir = root.join(".biblio");

        fs::create_dir_all(&biblio_dir).with_context(|| {
            format!("Failed to create .biblio directory: {}", biblio_dir.display())
        })?;

        let backups_dir = biblio_dir.join("backups");
        fs::create_dir_all(&backups_dir).with_context(|| {
            format!("Failed to create backups directory: {}", backups_dir.display())
        })?;

        let config_path = biblio_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Biblio configuration

# Loan period in days for newly issued books
loan_period_days = 14

[backup]
# Snapshot the data files before each mutating save
enabled = true

# How many backups to keep (oldest pruned first)
max_backups = 30
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let gitignore_path = biblio_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = "# Backups are local recovery state\nbackups/\n";
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the library root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.biblio` data directory path
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(".biblio")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir().join("catalog.jsonl")
    }

    /// Path of the roster file
    pub fn roster_path(&self) -> PathBuf {
        self.data_dir().join("roster.jsonl")
    }

    /// Path of the ledger file
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir().join("ledger.jsonl")
    }

    /// Returns the catalog store
    pub fn catalog_store(&self) -> CatalogStore {
        CatalogStore::new(self.catalog_path())
    }

    /// Returns the roster store
    pub fn roster_store(&self) -> RosterStore {
        RosterStore::new(self.roster_path())
    }

    /// Returns the ledger store
    pub fn ledger_store(&self) -> LedgerStore {
        LedgerStore::new(self.ledger_path())
    }

    /// Returns the backup manager covering all three data files
    pub fn backups(&self) -> BackupManager {
        BackupManager::new(
            self.data_dir().join("backups"),
            vec![self.catalog_path(), self.roster_path(), self.ledger_path()],
        )
    }
}
