//! Orphaned blob cleanup
//!
//! Deleting an entry, or detaching media from it, leaves the blob behind.
//! A sweep compares the object store's keys with every reference held by
//! the entry collection and removes the keys nothing points at.

use tracing::{info, warn};

use crate::archive::document::collect_blob_refs;
use crate::error::LuminaResult;
use crate::models::BlobRef;
use crate::storage::Storage;

/// Result of an orphan sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    /// Keys with no live reference
    pub orphaned: Vec<BlobRef>,
    /// Keys actually removed (empty on a dry run)
    pub deleted: Vec<BlobRef>,
    /// Total bytes held by the orphaned blobs
    pub reclaimed_bytes: u64,
    pub dry_run: bool,
}

/// Blobs in the object store that no entry references
pub fn find_orphaned_blobs(storage: &Storage) -> LuminaResult<Vec<BlobRef>> {
    let live = collect_blob_refs(&storage.entries.get_all()?);
    let orphans = storage
        .blobs()
        .keys()?
        .into_iter()
        .filter(|key| !live.contains(key))
        .collect();
    Ok(orphans)
}

/// Find orphaned blobs and, unless `dry_run`, delete them
pub fn sweep_orphaned_blobs(storage: &Storage, dry_run: bool) -> LuminaResult<SweepReport> {
    let orphaned = find_orphaned_blobs(storage)?;
    let blobs = storage.blobs();

    let mut report = SweepReport {
        dry_run,
        ..SweepReport::default()
    };

    for key in &orphaned {
        match blobs.size(key) {
            Ok(Some(size)) => report.reclaimed_bytes += size,
            Ok(None) => {}
            Err(e) => warn!(blob = %key, error = %e, "could not size orphaned blob"),
        }

        if !dry_run {
            blobs.delete(key)?;
            report.deleted.push(key.clone());
        }
    }

    info!(
        orphaned = orphaned.len(),
        deleted = report.deleted.len(),
        dry_run,
        "orphan sweep finished"
    );
    report.orphaned = orphaned;
    Ok(report)
}
