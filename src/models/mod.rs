//! Core data models for Lumina
//!
//! This module contains the data structures of the journaling domain:
//! entries, media attachments, blob references, cached reports and drafts.

pub mod blob_ref;
pub mod draft;
pub mod entry;
pub mod ids;
pub mod media;
pub mod reports;

pub use blob_ref::BlobRef;
pub use draft::Draft;
pub use entry::{
    EntryValidationError, JournalEntry, MoodAnalysis, PositiveReflection, ScheduleBlock, TodoItem,
};
pub use ids::{EntryId, MediaId, TodoId};
pub use media::{JournalMedia, MediaKind, MediaSource};
pub use reports::{DailyGuidance, JourneyChapter, LifeJourneyAnalysis, PatternAnalysis};
