//! Archive export
//!
//! Packs the entry collection, the cached pattern and journey reports, and
//! every blob those entries reference into one `.tar.gz` stream.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use flate2::{write::GzEncoder, Compression};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{LuminaError, LuminaResult};
use crate::models::BlobRef;
use crate::storage::{BlobStore, Storage};

use super::document::{media_member_name, ArchiveDocument, DOCUMENT_NAME};

/// Outcome of an export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Timestamp written into the document
    pub exported_at: DateTime<Utc>,
    /// Entries written into the document
    pub entry_count: usize,
    /// Blobs written under `media/`
    pub media_written: usize,
    /// Referenced blobs that could not be fetched and were left out
    pub missing: Vec<BlobRef>,
}

impl ExportSummary {
    /// Whether every referenced blob made it into the archive
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Builds archives from the current local state
pub struct ArchiveExporter<'a> {
    storage: &'a Storage,
}

impl<'a> ArchiveExporter<'a> {
    /// Create a new exporter
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Write an archive to `writer`
    ///
    /// A referenced blob that is missing from the store, or cannot be read,
    /// is logged and omitted; it never fails the export.
    pub fn export_to_writer<W: Write>(&self, writer: W) -> LuminaResult<ExportSummary> {
        let entries = self.storage.entries.get_all()?;
        let analysis = self.storage.analysis.get()?;
        let journey = self.storage.journey.get()?;

        let document = ArchiveDocument::new(entries, analysis, journey);
        let document_bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| LuminaError::Export(format!("Failed to serialize document: {}", e)))?;

        let refs = document.blob_refs();
        debug!(references = refs.len(), "fetching referenced blobs");
        let fetched = fetch_blobs(self.storage.blobs(), &refs);

        let mtime = document.exported_at.timestamp().max(0) as u64;
        let mut tar = tar::Builder::new(GzEncoder::new(writer, Compression::default()));

        append_member(&mut tar, DOCUMENT_NAME, &document_bytes, mtime).map_err(export_err)?;

        let mut media_written = 0;
        let mut missing = Vec::new();
        for (blob, content) in fetched {
            match content {
                Some(bytes) => {
                    append_member(&mut tar, &media_member_name(&blob), &bytes, mtime)
                        .map_err(export_err)?;
                    media_written += 1;
                }
                None => missing.push(blob),
            }
        }

        tar.into_inner()
            .and_then(|encoder| encoder.finish())
            .and_then(|mut inner| inner.flush())
            .map_err(export_err)?;

        let summary = ExportSummary {
            exported_at: document.exported_at,
            entry_count: document.entry_count(),
            media_written,
            missing,
        };

        info!(
            entries = summary.entry_count,
            media = summary.media_written,
            missing = summary.missing.len(),
            "export complete"
        );
        Ok(summary)
    }

    /// Build an archive in memory
    pub fn export_to_bytes(&self) -> LuminaResult<(Vec<u8>, ExportSummary)> {
        let mut buf = Vec::new();
        let summary = self.export_to_writer(&mut buf)?;
        Ok((buf, summary))
    }

    /// Write an archive to a file, removing the partial file on failure
    pub fn export_to_file(&self, path: &Path) -> LuminaResult<ExportSummary> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LuminaError::Export(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = File::create(path).map_err(|e| {
            LuminaError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;

        let result = self.export_to_writer(BufWriter::new(file));
        if result.is_err() {
            let _ = fs::remove_file(path);
        }
        result
    }
}

/// Fetch every referenced blob concurrently and wait for all of them
fn fetch_blobs(store: &dyn BlobStore, refs: &BTreeSet<BlobRef>) -> Vec<(BlobRef, Option<Vec<u8>>)> {
    refs.par_iter()
        .map(|blob| {
            let content = match store.get(blob) {
                Ok(Some(bytes)) => Some(bytes),
                Ok(None) => {
                    warn!(blob = %blob, "referenced blob missing from store, leaving it out");
                    None
                }
                Err(e) => {
                    warn!(blob = %blob, error = %e, "failed to read blob, leaving it out");
                    None
                }
            };
            (blob.clone(), content)
        })
        .collect()
}

fn append_member<W: Write>(
    tar: &mut tar::Builder<W>,
    name: &str,
    data: &[u8],
    mtime: u64,
) -> io::Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    tar.append_data(&mut header, name, data)
}

fn export_err(e: io::Error) -> LuminaError {
    LuminaError::Export(format!("Failed to write archive: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LuminaPaths;
    use crate::models::{JournalEntry, JournalMedia, MediaKind};
    use crate::storage::blobs::faulty::FaultyBlobStore;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LuminaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn member_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|m| String::from_utf8_lossy(&m.unwrap().path_bytes()).into_owned())
            .collect()
    }

    #[test]
    fn test_export_empty_journal() {
        let (_temp, storage) = create_test_storage();

        let (bytes, summary) = ArchiveExporter::new(&storage).export_to_bytes().unwrap();

        assert_eq!(summary.entry_count, 0);
        assert_eq!(summary.media_written, 0);
        assert_eq!(member_names(&bytes), vec![DOCUMENT_NAME]);
    }

    #[test]
    fn test_export_includes_referenced_blobs_once() {
        let (_temp, storage) = create_test_storage();
        let blob = BlobRef::parse("sketch-1").unwrap();
        storage.blobs().put(&blob, b"strokes").unwrap();
        storage.blobs().put(&BlobRef::parse("unreferenced").unwrap(), b"x").unwrap();

        for text in ["one", "two"] {
            let mut entry = JournalEntry::new(text);
            entry.media.push(JournalMedia::from_blob(MediaKind::Drawing, "image/png", blob.clone()));
            storage.entries.save_entry(entry).unwrap();
        }

        let (bytes, summary) = ArchiveExporter::new(&storage).export_to_bytes().unwrap();

        assert_eq!(summary.media_written, 1);
        assert!(summary.is_complete());
        assert_eq!(member_names(&bytes), vec![DOCUMENT_NAME, "media/sketch-1"]);
    }

    #[test]
    fn test_missing_blob_is_omitted() {
        let (_temp, storage) = create_test_storage();

        let mut entry = JournalEntry::new("lost attachment");
        entry.media.push(JournalMedia::from_blob(
            MediaKind::Audio,
            "audio/webm",
            BlobRef::parse("gone").unwrap(),
        ));
        storage.entries.save_entry(entry).unwrap();

        let (bytes, summary) = ArchiveExporter::new(&storage).export_to_bytes().unwrap();

        assert_eq!(summary.media_written, 0);
        assert_eq!(summary.missing, vec![BlobRef::parse("gone").unwrap()]);
        assert_eq!(member_names(&bytes), vec![DOCUMENT_NAME]);
    }

    #[test]
    fn test_unreadable_blob_is_omitted() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LuminaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let blobs = FaultyBlobStore::new(paths.blob_dir()).fail_reads("damaged");
        let storage = Storage::with_blob_store(paths, Box::new(blobs)).unwrap();

        let mut entry = JournalEntry::new("one good, one damaged");
        for name in ["damaged", "intact"] {
            let blob = BlobRef::parse(name).unwrap();
            storage.blobs().put(&blob, name.as_bytes()).unwrap();
            entry.media.push(JournalMedia::from_blob(MediaKind::Image, "image/png", blob));
        }
        storage.entries.save_entry(entry).unwrap();

        let (bytes, summary) = ArchiveExporter::new(&storage).export_to_bytes().unwrap();

        assert_eq!(summary.entry_count, 1);
        assert_eq!(summary.media_written, 1);
        assert_eq!(summary.missing, vec![BlobRef::parse("damaged").unwrap()]);
        assert_eq!(member_names(&bytes), vec![DOCUMENT_NAME, "media/intact"]);
    }

    #[test]
    fn test_document_contents() {
        let (_temp, storage) = create_test_storage();
        storage.entries.save_entry(JournalEntry::new("hello")).unwrap();

        let (bytes, _) = ArchiveExporter::new(&storage).export_to_bytes().unwrap();

        let mut archive = tar::Archive::new(GzDecoder::new(bytes.as_slice()));
        let mut member = archive.entries().unwrap().next().unwrap().unwrap();
        let mut json = String::new();
        member.read_to_string(&mut json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"][0]["content"], "hello");
        assert!(value["analysis"].is_null());
    }

    #[test]
    fn test_export_to_file() {
        let (temp, storage) = create_test_storage();
        let path = temp.path().join("out").join("journal.tar.gz");

        let summary = ArchiveExporter::new(&storage).export_to_file(&path).unwrap();

        assert!(path.exists());
        assert_eq!(summary.entry_count, 0);
    }
}
