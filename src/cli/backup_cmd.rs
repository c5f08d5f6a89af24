//! Backup CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::Library;

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the current data files
    Create {
        /// Label for the backup directory
        #[arg(default_value = "manual")]
        label: String,
    },

    /// List available backups, newest first
    List,

    /// Copy a backup's files back over the live data
    Restore {
        /// Backup name (defaults to the most recent)
        name: Option<String>,
    },
}

pub fn run(cmd: BackupCommands, output: &Output) -> Result<()> {
    match cmd {
        BackupCommands::Create { label } => create(output, &label),
        BackupCommands::List => list(output),
        BackupCommands::Restore { name } => restore(output, name.as_deref()),
    }
}

fn create(output: &Output, label: &str) -> Result<()> {
    let library = Library::open_current()?;
    let path = library.backups().create(label)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "created": path.display().to_string(),
        }));
    } else {
        output.success(&format!("Created backup: {}", path.display()));
    }

    Ok(())
}

fn list(output: &Output) -> Result<()> {
    let library = Library::open_current()?;
    let backups = library.backups().list()?;

    if output.is_json() {
        let items: Vec<_> = backups
            .iter()
            .map(|b| {
                serde_json::json!({
                    "name": b.name,
                    "path": b.path.display().to_string(),
                })
            })
            .collect();
        output.data(&items);
    } else if backups.is_empty() {
        println!("No backups.");
    } else {
        for backup in &backups {
            println!("{}", backup.name);
        }
    }

    Ok(())
}

fn restore(output: &Output, name: Option<&str>) -> Result<()> {
    let library = Library::open_current()?;
    let backups = library.backups();

    let name = match name {
        Some(name) => name.to_string(),
        None => backups
            .latest()?
            .ok_or_else(|| anyhow::anyhow!("No backups to restore"))?
            .name,
    };

    backups.restore(&name)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "restored": name }));
    } else {
        output.success(&format!("Restored backup: {}", name));
    }

    Ok(())
}
