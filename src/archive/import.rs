//! Archive import
//!
//! Replaces local state with the contents of an archive. The whole archive
//! is read and validated in memory before anything is written, so a
//! malformed archive never changes local state. Once writing starts there is
//! no rollback: a storage failure part-way leaves the record slots replaced
//! and only some blobs restored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use rayon::prelude::*;
use tracing::{debug, error, info};

use crate::error::{LuminaError, LuminaResult};
use crate::models::BlobRef;
use crate::storage::Storage;

use super::document::{ArchiveDocument, DOCUMENT_NAME, MEDIA_PREFIX};

/// Outcome of a successful import
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Format version of the imported document
    pub format_version: u32,
    /// When the archive was exported
    pub exported_at: DateTime<Utc>,
    /// Number of entries written, or `None` if the document had no entries
    pub entries_restored: Option<usize>,
    /// Whether the cached pattern analysis was replaced
    pub analysis_restored: bool,
    /// Whether the cached journey report was replaced
    pub journey_restored: bool,
    /// Blobs written to the object store
    pub media_restored: usize,
}

impl ImportSummary {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(count) = self.entries_restored {
            parts.push(format!("{} entries", count));
        }
        if self.analysis_restored {
            parts.push("pattern analysis".to_string());
        }
        if self.journey_restored {
            parts.push("journey report".to_string());
        }
        parts.push(format!("{} media files", self.media_restored));
        format!("Restored: {}", parts.join(", "))
    }
}

/// Archive contents read fully into memory
#[derive(Debug)]
pub(crate) struct StagedArchive {
    pub document: ArchiveDocument,
    /// Media members by reference; a repeated member replaces the earlier one
    pub media: BTreeMap<BlobRef, Vec<u8>>,
}

impl StagedArchive {
    /// Read and validate an archive without touching local state
    pub(crate) fn read<R: Read>(reader: R) -> LuminaResult<Self> {
        let mut archive = tar::Archive::new(GzDecoder::new(reader));
        let mut document_bytes = None;
        let mut media = BTreeMap::new();

        for member in archive.entries().map_err(corrupt)? {
            let mut member = member.map_err(corrupt)?;
            if !member.header().entry_type().is_file() {
                continue;
            }

            let name = String::from_utf8_lossy(&member.path_bytes()).into_owned();

            if name == DOCUMENT_NAME {
                let mut buf = Vec::new();
                member.read_to_end(&mut buf).map_err(corrupt)?;
                document_bytes = Some(buf);
            } else if let Some(key) = name.strip_prefix(MEDIA_PREFIX) {
                let blob = BlobRef::parse(key).map_err(|e| {
                    LuminaError::Archive(format!("Invalid media member '{}': {}", name, e))
                })?;
                let mut buf = Vec::new();
                member.read_to_end(&mut buf).map_err(corrupt)?;
                debug!(blob = %blob, bytes = buf.len(), "staged media member");
                if media.insert(blob, buf).is_some() {
                    debug!(member = %name, "repeated media member replaces earlier copy");
                }
            } else {
                debug!(member = %name, "skipping unrecognised archive member");
            }
        }

        let document_bytes = document_bytes
            .ok_or_else(|| LuminaError::Archive(format!("Archive has no {}", DOCUMENT_NAME)))?;
        let document = ArchiveDocument::from_slice(&document_bytes)?;

        Ok(Self { document, media })
    }
}

fn corrupt(e: std::io::Error) -> LuminaError {
    LuminaError::Archive(format!("Corrupt archive: {}", e))
}

/// Restores archives into local state
pub struct ArchiveImporter<'a> {
    storage: &'a Storage,
}

impl<'a> ArchiveImporter<'a> {
    /// Create a new importer
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import an archive, reporting success as a single boolean
    ///
    /// Every failure is logged and turned into `false`.
    pub fn import<R: Read>(&self, reader: R) -> bool {
        match self.try_import(reader) {
            Ok(summary) => {
                info!(
                    entries = ?summary.entries_restored,
                    media = summary.media_restored,
                    "import complete"
                );
                true
            }
            Err(e) => {
                error!(error = %e, "import failed");
                false
            }
        }
    }

    /// Import an archive file, reporting success as a single boolean
    pub fn import_file(&self, path: &Path) -> bool {
        match File::open(path) {
            Ok(file) => self.import(BufReader::new(file)),
            Err(e) => {
                error!(path = %path.display(), error = %e, "import failed: cannot open archive");
                false
            }
        }
    }

    /// Import an archive, returning what was restored
    ///
    /// The entry collection and each cached report are overwritten only when
    /// the document carries them; absent or `null` fields keep the current
    /// local value. Media blobs are written concurrently and all writes are
    /// waited for before the result is reported.
    pub fn try_import<R: Read>(&self, reader: R) -> LuminaResult<ImportSummary> {
        let staged = StagedArchive::read(reader)?;
        self.apply(staged)
    }

    fn apply(&self, staged: StagedArchive) -> LuminaResult<ImportSummary> {
        let StagedArchive { document, media } = staged;

        let mut summary = ImportSummary {
            format_version: document.format_version,
            exported_at: document.exported_at,
            ..ImportSummary::default()
        };

        if let Some(entries) = &document.entries {
            self.storage.entries.replace_all(entries)?;
            summary.entries_restored = Some(entries.len());
        }

        if let Some(analysis) = &document.analysis {
            self.storage.analysis.set(analysis)?;
            summary.analysis_restored = true;
        }

        if let Some(journey) = &document.journey_report {
            self.storage.journey.set(journey)?;
            summary.journey_restored = true;
        }

        let blobs = self.storage.blobs();
        let results: Vec<LuminaResult<()>> = media
            .par_iter()
            .map(|(blob, content)| {
                blobs.put(blob, content).map_err(|e| {
                    error!(blob = %blob, error = %e, "failed to restore blob");
                    e
                })
            })
            .collect();

        let total = results.len();
        let mut failures = results.into_iter().filter_map(Result::err);
        if let Some(first) = failures.next() {
            let failed = 1 + failures.count();
            return Err(LuminaError::BlobStore(format!(
                "{} of {} media files could not be restored (first error: {})",
                failed, total, first
            )));
        }

        summary.media_restored = total;
        Ok(summary)
    }
}

/// What an archive contains, read without importing it
#[derive(Debug)]
pub struct ArchiveInfo {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub entry_count: usize,
    pub has_entries: bool,
    pub has_analysis: bool,
    pub has_journey: bool,
    pub media_count: usize,
    /// References held by entries that have no media member
    pub missing_media: Vec<BlobRef>,
}

impl ArchiveInfo {
    /// Read an archive and describe it
    pub fn inspect<R: Read>(reader: R) -> LuminaResult<Self> {
        let staged = StagedArchive::read(reader)?;
        let missing_media = staged
            .document
            .blob_refs()
            .into_iter()
            .filter(|r| !staged.media.contains_key(r))
            .collect();

        Ok(Self {
            format_version: staged.document.format_version,
            exported_at: staged.document.exported_at,
            entry_count: staged.document.entry_count(),
            has_entries: staged.document.entries.is_some(),
            has_analysis: staged.document.analysis.is_some(),
            has_journey: staged.document.journey_report.is_some(),
            media_count: staged.media.len(),
            missing_media,
        })
    }

    /// Read an archive file and describe it
    pub fn inspect_file(path: &Path) -> LuminaResult<Self> {
        let file = File::open(path)
            .map_err(|e| LuminaError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
        Self::inspect(BufReader::new(file))
    }

    /// Whether every referenced blob is present
    pub fn is_complete(&self) -> bool {
        self.missing_media.is_empty()
    }
}
