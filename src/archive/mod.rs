//! Archive export and import
//!
//! An archive packages the whole journal (entries, cached reports and every
//! referenced media blob) into a single portable `.tar.gz` file.
//!
//! # Layout
//!
//! - `lumina.json`: the [`ArchiveDocument`]
//! - `media/<blob-ref>`: one member per referenced blob, raw bytes
//!
//! # Example
//!
//! ```rust,ignore
//! use lumina::archive::{ArchiveExporter, ArchiveImporter};
//!
//! let (bytes, _) = ArchiveExporter::new(&storage).export_to_bytes()?;
//! let ok = ArchiveImporter::new(&other_storage).import(bytes.as_slice());
//! ```

pub mod document;
mod export;
mod import;
mod manager;

pub use document::{ArchiveDocument, DOCUMENT_NAME, FORMAT_VERSION, MEDIA_PREFIX};
pub use export::{ArchiveExporter, ExportSummary};
pub use import::{ArchiveImporter, ArchiveInfo, ImportSummary};
pub use manager::{BackupInfo, BackupManager};
