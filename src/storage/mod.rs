//! Storage layer for Lumina
//!
//! Two engines live side by side:
//!
//! - the structured record store: one JSON document per logical slot
//!   (entry collection, cached reports, draft), written atomically;
//! - the binary object store: opaque payloads keyed by [`BlobRef`](crate::models::BlobRef).

pub mod blobs;
pub mod entries;
pub mod file_io;
pub mod slots;

pub use blobs::{BlobStore, FsBlobStore};
pub use entries::EntryRepository;
pub use slots::SlotRepository;

use crate::config::paths::LuminaPaths;
use crate::error::LuminaError;
use crate::models::{DailyGuidance, Draft, LifeJourneyAnalysis, PatternAnalysis};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LuminaPaths,
    pub entries: EntryRepository,
    pub analysis: SlotRepository<PatternAnalysis>,
    pub journey: SlotRepository<LifeJourneyAnalysis>,
    pub guidance: SlotRepository<DailyGuidance>,
    pub draft: SlotRepository<Draft>,
    blobs: Box<dyn BlobStore>,
}

impl Storage {
    /// Create a new Storage instance backed by the on-disk blob store
    pub fn new(paths: LuminaPaths) -> Result<Self, LuminaError> {
        let blobs = FsBlobStore::new(paths.blob_dir());
        Self::with_blob_store(paths, Box::new(blobs))
    }

    /// Create a Storage instance with an alternative blob engine
    pub fn with_blob_store(
        paths: LuminaPaths,
        blobs: Box<dyn BlobStore>,
    ) -> Result<Self, LuminaError> {
        paths.ensure_directories()?;

        Ok(Self {
            entries: EntryRepository::new(paths.entries_file()),
            analysis: SlotRepository::new(paths.analysis_file()),
            journey: SlotRepository::new(paths.journey_file()),
            guidance: SlotRepository::new(paths.guidance_file()),
            draft: SlotRepository::new(paths.draft_file()),
            blobs,
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LuminaPaths {
        &self.paths
    }

    /// Get the binary object store
    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }
}
