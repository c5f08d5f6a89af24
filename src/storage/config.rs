//! Configuration handling for Biblio
//!
//! Configuration is stored in `.biblio/config.toml` (library) and
//! `~/.config/biblio/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Backup behavior around catalog/roster saves
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackupConfig {
    /// Snapshot the data files before each mutating save
    pub enabled: bool,

    /// How many backups to keep (oldest pruned first)
    pub max_backups: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_backups: 30,
        }
    }
}

/// Library-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Loan period in days for newly issued books
    pub loan_period_days: u32,

    /// Backup settings
    pub backup: BackupConfig,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
            backup: BackupConfig::default(),
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + library)
#[derive(Debug, Clone)]
pub struct Config {
    pub library: LibraryConfig,
    pub global: GlobalConfig,
    pub library_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific library root
    pub fn for_library(library_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let library = Self::load_library_config(library_root)?;

        Ok(Self {
            library,
            global,
            library_root: Some(library_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "biblio", "biblio-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads library configuration from a specific root
    fn load_library_config(library_root: &Path) -> Result<LibraryConfig> {
        let config_path = library_root.join(".biblio").join("config.toml");

        if !config_path.exists() {
            return Ok(LibraryConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read library config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse library config")
    }

    /// Finds the library root by looking for a `.biblio/` directory
    pub fn find_library_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let biblio_dir = current.join(".biblio");
            if biblio_dir.is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = LibraryConfig::default();
        assert_eq!(config.loan_period_days, 14);
        assert!(config.backup.enabled);
        assert_eq!(config.backup.max_backups, 30);
    }

    #[test]
    fn parse_library_config() {
        let toml = r#"
loan_period_days = 21

[backup]
enabled = false
"#;

        let config: LibraryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.loan_period_days, 21);
        assert!(!config.backup.enabled);
        // unset keys fall back to defaults
        assert_eq!(config.backup.max_backups, 30);
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"default_format = "json""#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn missing_library_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_library_config(dir.path()).unwrap();
        assert_eq!(config, LibraryConfig::default());
    }
}
