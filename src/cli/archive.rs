//! Archive CLI commands
//!
//! Export the journal to a portable archive, inspect one, or import one in
//! place of the current journal.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::archive::{ArchiveExporter, ArchiveImporter, ArchiveInfo, BackupManager};
use crate::config::Settings;
use crate::display::report::{format_archive_info, format_size};
use crate::error::{LuminaError, LuminaResult};
use crate::storage::Storage;

/// Handle the export command
pub fn handle_export_command(storage: &Storage, output: &Path) -> LuminaResult<()> {
    println!("Exporting journal...");
    let summary = ArchiveExporter::new(storage).export_to_file(output)?;

    let size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    println!(
        "Exported {} entries and {} media files to {} ({})",
        summary.entry_count,
        summary.media_written,
        output.display(),
        format_size(size)
    );

    if !summary.is_complete() {
        println!();
        println!(
            "Note: {} referenced media file(s) were missing and left out:",
            summary.missing.len()
        );
        for blob in &summary.missing {
            println!("  {}", blob);
        }
    }
    Ok(())
}

/// Handle the inspect command
pub fn handle_inspect_command(input: &Path) -> LuminaResult<()> {
    let info = ArchiveInfo::inspect_file(input)?;
    println!("Archive: {}", input.display());
    print!("{}", format_archive_info(&info));
    Ok(())
}

/// Handle the import command
///
/// Without `force` only the archive's contents are shown. With it, the
/// current journal is backed up first and then replaced.
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    input: &Path,
    force: bool,
) -> LuminaResult<()> {
    let info = ArchiveInfo::inspect_file(input)?;

    println!("Archive Information");
    println!("===================");
    print!("{}", format_archive_info(&info));
    println!();

    if !force {
        println!("WARNING: This will overwrite your current journal!");
        println!("To proceed, run again with --force flag:");
        println!("  lumina import {} --force", input.display());
        return Ok(());
    }

    let manager = BackupManager::new(storage, settings.backup_retention.clone());
    println!("Creating backup of current journal before import...");
    let pre_import = manager.create_backup()?;
    println!("Pre-import backup saved: {}", pre_import.display());
    println!();

    let file = File::open(input).map_err(|e| {
        LuminaError::Io(format!("Failed to open {}: {}", input.display(), e))
    })?;
    let summary = ArchiveImporter::new(storage).try_import(BufReader::new(file))?;

    println!("Import complete!");
    println!("{}", summary.summary());
    Ok(())
}
