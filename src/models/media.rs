//! Media attachment model
//!
//! A media item points at exactly one piece of content: either a blob in the
//! object store or an external URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::blob_ref::BlobRef;
use super::ids::MediaId;

/// Kind of attached media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Drawing,
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Parse a media kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drawing" | "sketch" => Some(Self::Drawing),
            "image" | "photo" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" | "recording" => Some(Self::Audio),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drawing => write!(f, "drawing"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// Where the media content lives
///
/// Flattened into the media object as either a `blobId` or a `url` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaSource {
    #[serde(rename = "blobId")]
    Blob(BlobRef),
    #[serde(rename = "url")]
    External(String),
}

impl MediaSource {
    /// The blob reference, if this content lives in the object store
    pub fn blob_ref(&self) -> Option<&BlobRef> {
        match self {
            Self::Blob(r) => Some(r),
            Self::External(_) => None,
        }
    }
}

/// A media item attached to a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalMedia {
    pub id: MediaId,

    #[serde(rename = "type")]
    pub kind: MediaKind,

    pub mime_type: String,

    #[serde(flatten)]
    pub source: MediaSource,

    pub created_at: DateTime<Utc>,
}

impl JournalMedia {
    /// Create a media item backed by a blob
    pub fn from_blob(kind: MediaKind, mime_type: impl Into<String>, blob: BlobRef) -> Self {
        Self {
            id: MediaId::new(),
            kind,
            mime_type: mime_type.into(),
            source: MediaSource::Blob(blob),
            created_at: Utc::now(),
        }
    }

    /// Create a media item pointing at an external URL (e.g. an embedded video)
    pub fn from_url(kind: MediaKind, mime_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: MediaId::new(),
            kind,
            mime_type: mime_type.into(),
            source: MediaSource::External(url.into()),
            created_at: Utc::now(),
        }
    }

    /// The blob reference, if any
    pub fn blob_ref(&self) -> Option<&BlobRef> {
        self.source.blob_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blob_media_serializes_blob_id() {
        let media = JournalMedia::from_blob(
            MediaKind::Drawing,
            "image/png",
            BlobRef::parse("blob-abc").unwrap(),
        );
        let value = serde_json::to_value(&media).unwrap();

        assert_eq!(value["type"], "drawing");
        assert_eq!(value["mimeType"], "image/png");
        assert_eq!(value["blobId"], "blob-abc");
        assert!(value.get("url").is_none());
    }

    #[test]
    fn test_external_media_serializes_url() {
        let media = JournalMedia::from_url(MediaKind::Video, "video/mp4", "https://example.com/v");
        let value = serde_json::to_value(&media).unwrap();

        assert_eq!(value["url"], "https://example.com/v");
        assert!(value.get("blobId").is_none());
        assert!(media.blob_ref().is_none());
    }

    #[test]
    fn test_deserialize_from_document() {
        let value = json!({
            "id": "m1",
            "type": "audio",
            "mimeType": "audio/webm",
            "blobId": "rec-1",
            "createdAt": "2024-06-10T08:00:00Z"
        });
        let media: JournalMedia = serde_json::from_value(value).unwrap();

        assert_eq!(media.kind, MediaKind::Audio);
        assert_eq!(media.blob_ref().unwrap().as_str(), "rec-1");
    }

    #[test]
    fn test_media_kind_parse() {
        assert_eq!(MediaKind::parse("Photo"), Some(MediaKind::Image));
        assert_eq!(MediaKind::parse("recording"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::parse("hologram"), None);
    }
}
