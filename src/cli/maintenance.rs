//! Maintenance CLI commands

use crate::display::format_sweep_report;
use crate::error::LuminaResult;
use crate::services::sweep_orphaned_blobs;
use crate::storage::Storage;

/// Handle the gc command: remove media no entry references
pub fn handle_gc_command(storage: &Storage, dry_run: bool) -> LuminaResult<()> {
    let report = sweep_orphaned_blobs(storage, dry_run)?;
    println!("{}", format_sweep_report(&report).trim_end());
    if dry_run && !report.orphaned.is_empty() {
        println!();
        println!("Run without --dry-run to delete them.");
    }
    Ok(())
}
