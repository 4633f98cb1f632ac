//! User settings for Lumina
//!
//! Manages user preferences including log verbosity, streak day-boundary
//! handling, analysis window and backup retention.

use serde::{Deserialize, Serialize};

use super::paths::LuminaPaths;
use crate::error::LuminaError;

/// How streak calculation decides whether two dates are one day apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// Compare local midnights by elapsed milliseconds (exactly 24h apart).
    /// Matches the behaviour of existing journals, including its DST quirks.
    #[default]
    Elapsed,
    /// Compare calendar dates, so DST transitions never break a streak.
    Calendar,
}

impl DayBoundary {
    /// Parse a day boundary from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "elapsed" => Some(Self::Elapsed),
            "calendar" => Some(Self::Calendar),
            _ => None,
        }
    }
}

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// User settings for Lumina
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default tracing filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    /// Day-boundary rule used by streak calculation
    #[serde(default)]
    pub streak_day_boundary: DayBoundary,

    /// Number of most recent entries handed to pattern analysis
    #[serde(default = "default_analysis_window")]
    pub analysis_window: usize,

    /// Timestamp format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_analysis_window() -> usize {
    14
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_level: default_log_level(),
            backup_retention: BackupRetention::default(),
            streak_day_boundary: DayBoundary::default(),
            analysis_window: default_analysis_window(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LuminaPaths) -> Result<Self, LuminaError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LuminaError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LuminaError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LuminaPaths) -> Result<(), LuminaError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LuminaError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| LuminaError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.streak_day_boundary, DayBoundary::Elapsed);
        assert_eq!(settings.analysis_window, 14);
        assert_eq!(settings.backup_retention.daily_count, 30);
        assert_eq!(settings.backup_retention.monthly_count, 12);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LuminaPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.streak_day_boundary = DayBoundary::Calendar;
        settings.analysis_window = 30;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.streak_day_boundary, DayBoundary::Calendar);
        assert_eq!(loaded.analysis_window, 30);
    }

    #[test]
    fn test_sparse_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LuminaPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"log_level": "debug"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.log_level, "debug");
        assert_eq!(loaded.analysis_window, 14);
        assert_eq!(loaded.streak_day_boundary, DayBoundary::Elapsed);
    }

    #[test]
    fn test_load_missing_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LuminaPaths::with_base_dir(temp_dir.path().to_path_buf());

        Settings::load_or_create(&paths).unwrap();
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_day_boundary_parse() {
        assert_eq!(DayBoundary::parse("Calendar"), Some(DayBoundary::Calendar));
        assert_eq!(DayBoundary::parse(" elapsed "), Some(DayBoundary::Elapsed));
        assert_eq!(DayBoundary::parse("weekly"), None);
    }
}
