//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::PathBuf;

use crate::archive::{ArchiveInfo, BackupManager};
use crate::config::settings::Settings;
use crate::display::format_backup_list;
use crate::display::report::format_archive_info;
use crate::error::{LuminaError, LuminaResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create,

    /// List all available backups
    List,

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete old backups according to retention policy
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> LuminaResult<()> {
    let retention = settings.backup_retention.clone();
    let manager = BackupManager::new(storage, retention.clone());

    match cmd {
        BackupCommands::Create => {
            println!("Creating backup...");
            let (backup_path, pruned) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", backup_path.display());
            if !pruned.is_empty() {
                println!("Pruned {} old backup(s).", pruned.len());
            }
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;
            print!("{}", format_backup_list(&backups));
            if backups.is_empty() {
                println!();
                println!("Create one with: lumina backup create");
            } else {
                println!();
                println!("Total: {} backup(s)", backups.len());
            }
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let info = ArchiveInfo::inspect_file(&backup_path)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", backup_path.display());
            print!("{}", format_archive_info(&info));
            println!();

            if !force {
                println!("WARNING: This will overwrite your current journal!");
                println!("To proceed, run again with --force flag:");
                println!("  lumina backup restore {} --force", backup);
                return Ok(());
            }

            println!("Creating backup of current journal before restore...");
            let pre_restore = manager.create_backup()?;
            println!("Pre-restore backup saved: {}", pre_restore.display());
            println!();

            println!("Restoring from backup...");
            let summary = manager.restore_backup(&backup_path)?;
            println!("Restore complete!");
            println!("{}", summary.summary());
        }

        BackupCommands::Prune { force } => {
            let backups = manager.list_backups()?;
            let (monthly, daily): (Vec<_>, Vec<_>) = backups.iter().partition(|b| b.is_monthly);

            let daily_to_delete = daily.len().saturating_sub(retention.daily_count as usize);
            let monthly_to_delete = monthly
                .len()
                .saturating_sub(retention.monthly_count as usize);
            let total_to_delete = daily_to_delete + monthly_to_delete;

            if total_to_delete == 0 {
                println!("No backups to prune.");
                println!(
                    "Current retention policy: {} daily, {} monthly",
                    retention.daily_count, retention.monthly_count
                );
                return Ok(());
            }

            println!(
                "To be deleted: {} daily, {} monthly ({} total)",
                daily_to_delete, monthly_to_delete, total_to_delete
            );

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  lumina backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> LuminaResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| LuminaError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    if let Some(info) = manager.get_backup(backup)? {
        return Ok(info.path);
    }

    Err(LuminaError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}
