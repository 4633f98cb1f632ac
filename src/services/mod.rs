//! Service layer for Lumina
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, attachments, analysis and derived values.

pub mod analysis;
pub mod cleanup;
pub mod journal;
pub mod lexicon;
pub mod streak;

pub use analysis::{AnalysisService, JournalAnalyzer};
pub use cleanup::{find_orphaned_blobs, sweep_orphaned_blobs, SweepReport};
pub use journal::JournalService;
pub use lexicon::LexiconAnalyzer;
pub use streak::{calculate_streak, current_streak};
