//! Path management for Lumina
//!
//! Resolves where settings, record slots, blobs and backups live.
//!
//! ## Path Resolution Order
//!
//! 1. `LUMINA_DATA_DIR` environment variable (if set)
//! 2. Platform config directory (`~/.config/lumina` on Linux,
//!    `~/Library/Application Support/lumina` on macOS, `%APPDATA%\lumina` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::LuminaError;

/// Manages all paths used by Lumina
#[derive(Debug, Clone)]
pub struct LuminaPaths {
    /// Base directory for all Lumina data
    base_dir: PathBuf,
}

impl LuminaPaths {
    /// Create a new LuminaPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LuminaError> {
        let base_dir = if let Ok(custom) = std::env::var("LUMINA_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LuminaPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the structured record slots
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the binary object store directory
    pub fn blob_dir(&self) -> PathBuf {
        self.base_dir.join("blobs")
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to entries.json
    pub fn entries_file(&self) -> PathBuf {
        self.data_dir().join("entries.json")
    }

    /// Get the path to the cached pattern analysis
    pub fn analysis_file(&self) -> PathBuf {
        self.data_dir().join("analysis.json")
    }

    /// Get the path to the cached life-journey report
    pub fn journey_file(&self) -> PathBuf {
        self.data_dir().join("journey.json")
    }

    /// Get the path to the cached daily guidance
    pub fn guidance_file(&self) -> PathBuf {
        self.data_dir().join("guidance.json")
    }

    /// Get the path to the unsaved draft
    pub fn draft_file(&self) -> PathBuf {
        self.data_dir().join("draft.json")
    }

    /// Ensure the base, data and backup directories exist
    ///
    /// The blob directory is created lazily by the blob store on first use.
    pub fn ensure_directories(&self) -> Result<(), LuminaError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LuminaError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LuminaError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| LuminaError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if Lumina has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LuminaError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| LuminaError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("lumina"))
}
