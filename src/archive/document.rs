//! Archive document format
//!
//! An archive is a gzip-compressed tar stream with one JSON document at
//! [`DOCUMENT_NAME`] and zero or more blobs under [`MEDIA_PREFIX`], each
//! named by its blob reference with no extension.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LuminaError;
use crate::models::{BlobRef, JournalEntry, LifeJourneyAnalysis, PatternAnalysis};

/// Current archive format version
pub const FORMAT_VERSION: u32 = 1;

/// Member name of the JSON document
pub const DOCUMENT_NAME: &str = "lumina.json";

/// Directory prefix of media members
pub const MEDIA_PREFIX: &str = "media/";

/// The JSON document stored in an archive
///
/// Every field except the export timestamp may be missing from documents
/// read back in; missing and `null` fields leave local state untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveDocument {
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    #[serde(rename = "exportedAtISO8601")]
    pub exported_at: DateTime<Utc>,

    #[serde(default)]
    pub entries: Option<Vec<JournalEntry>>,

    /// Always written, as `null` when no analysis is cached
    #[serde(default)]
    pub analysis: Option<PatternAnalysis>,

    #[serde(default)]
    pub journey_report: Option<LifeJourneyAnalysis>,
}

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

impl ArchiveDocument {
    /// Build a document stamped with the current time
    pub fn new(
        entries: Vec<JournalEntry>,
        analysis: Option<PatternAnalysis>,
        journey_report: Option<LifeJourneyAnalysis>,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            exported_at: Utc::now(),
            entries: Some(entries),
            analysis,
            journey_report,
        }
    }

    /// Parse a document, rejecting versions newer than this build understands
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LuminaError> {
        let document: ArchiveDocument = serde_json::from_slice(bytes)
            .map_err(|e| LuminaError::Archive(format!("Unreadable {}: {}", DOCUMENT_NAME, e)))?;

        if document.format_version > FORMAT_VERSION {
            return Err(LuminaError::Archive(format!(
                "Unsupported format version {} (newest supported is {})",
                document.format_version, FORMAT_VERSION
            )));
        }

        Ok(document)
    }

    /// Number of entries carried by the document
    pub fn entry_count(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    /// Deduplicated blob references held by the document's entries
    pub fn blob_refs(&self) -> BTreeSet<BlobRef> {
        collect_blob_refs(self.entries.as_deref().unwrap_or_default())
    }
}

/// Deduplicated set of every blob reference held by `entries`
pub fn collect_blob_refs(entries: &[JournalEntry]) -> BTreeSet<BlobRef> {
    entries
        .iter()
        .flat_map(|e| e.blob_refs())
        .cloned()
        .collect()
}

/// Archive member name for a blob
pub fn media_member_name(blob: &BlobRef) -> String {
    format!("{}{}", MEDIA_PREFIX, blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JournalMedia, MediaKind, PositiveReflection};
    use serde_json::json;

    #[test]
    fn test_serialized_keys() {
        let document = ArchiveDocument::new(vec![], None, None);
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["formatVersion"], 1);
        assert!(value["exportedAtISO8601"].is_string());
        assert!(value["entries"].is_array());
        assert!(value["analysis"].is_null());
        assert!(value["journeyReport"].is_null());
    }

    #[test]
    fn test_missing_fields_parse_as_none() {
        let bytes = serde_json::to_vec(&json!({
            "exportedAtISO8601": "2024-06-10T12:00:00Z"
        }))
        .unwrap();

        let document = ArchiveDocument::from_slice(&bytes).unwrap();
        assert_eq!(document.format_version, FORMAT_VERSION);
        assert!(document.entries.is_none());
        assert!(document.analysis.is_none());
        assert_eq!(document.entry_count(), 0);
    }

    #[test]
    fn test_newer_version_rejected() {
        let bytes = serde_json::to_vec(&json!({
            "formatVersion": FORMAT_VERSION + 1,
            "exportedAtISO8601": "2024-06-10T12:00:00Z"
        }))
        .unwrap();

        let err = ArchiveDocument::from_slice(&bytes).unwrap_err();
        assert!(matches!(err, LuminaError::Archive(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        let err = ArchiveDocument::from_slice(b"\x00\x01 nope").unwrap_err();
        assert!(matches!(err, LuminaError::Archive(_)));
    }

    #[test]
    fn test_collect_blob_refs_deduplicates() {
        let shared = BlobRef::parse("shared").unwrap();

        let mut first = JournalEntry::new("one");
        first.media.push(JournalMedia::from_blob(MediaKind::Image, "image/png", shared.clone()));
        first.positive_reflection = Some(PositiveReflection {
            quote: "Keep going".into(),
            image_ref: Some(BlobRef::parse("quote-art").unwrap()),
        });

        let mut second = JournalEntry::new("two");
        second.media.push(JournalMedia::from_blob(MediaKind::Image, "image/png", shared));
        second.media.push(JournalMedia::from_url(MediaKind::Video, "video/mp4", "https://v"));

        let refs: Vec<String> = collect_blob_refs(&[first, second])
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(refs, vec!["quote-art", "shared"]);
    }

    #[test]
    fn test_media_member_name() {
        let blob = BlobRef::parse("rec-7").unwrap();
        assert_eq!(media_member_name(&blob), "media/rec-7");
    }
}
