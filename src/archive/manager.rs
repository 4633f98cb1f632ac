//! Rolling backups
//!
//! Backups are ordinary archives written into the backup directory under
//! dated file names, pruned by a daily/monthly retention policy.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::{debug, info};

use crate::config::settings::BackupRetention;
use crate::error::{LuminaError, LuminaResult};
use crate::storage::Storage;

use super::export::ArchiveExporter;
use super::import::{ArchiveImporter, ImportSummary};

const BACKUP_PREFIX: &str = "lumina-backup-";
const BACKUP_SUFFIX: &str = ".tar.gz";

/// Metadata about a backup
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
    /// Whether this is a monthly backup (kept longer)
    pub is_monthly: bool,
}

/// Manages backup creation, restoration and retention
pub struct BackupManager<'a> {
    storage: &'a Storage,
    backup_dir: PathBuf,
    retention: BackupRetention,
}

impl<'a> BackupManager<'a> {
    /// Create a new BackupManager
    pub fn new(storage: &'a Storage, retention: BackupRetention) -> Self {
        Self {
            backup_dir: storage.paths().backup_dir(),
            storage,
            retention,
        }
    }

    /// Export the current journal into a new backup file
    pub fn create_backup(&self) -> LuminaResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            LuminaError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let filename = format!(
            "{}{}-{:03}{}",
            BACKUP_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis(),
            BACKUP_SUFFIX
        );
        let backup_path = self.backup_dir.join(&filename);

        let summary = ArchiveExporter::new(self.storage).export_to_file(&backup_path)?;
        info!(
            backup = %filename,
            entries = summary.entry_count,
            media = summary.media_written,
            "created backup"
        );

        Ok(backup_path)
    }

    /// Replace local state with a backup's contents
    pub fn restore_backup(&self, path: &Path) -> LuminaResult<ImportSummary> {
        let file = fs::File::open(path).map_err(|e| {
            LuminaError::Io(format!("Failed to open backup {}: {}", path.display(), e))
        })?;
        ArchiveImporter::new(self.storage).try_import(std::io::BufReader::new(file))
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> LuminaResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            LuminaError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                LuminaError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(backups)
    }

    /// Enforce retention policy by deleting old backups
    pub fn enforce_retention(&self) -> LuminaResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let mut deleted = Vec::new();

        let (monthly, daily): (Vec<_>, Vec<_>) = backups.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        for backup in expired {
            fs::remove_file(&backup.path).map_err(|e| {
                LuminaError::Io(format!("Failed to delete old backup: {}", e))
            })?;
            debug!(backup = %backup.filename, "pruned backup");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce retention policy
    pub fn create_backup_with_retention(&self) -> LuminaResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> LuminaResult<Option<BackupInfo>> {
        let path = self.backup_dir.join(filename);
        if path.exists() {
            Ok(parse_backup_info(&path))
        } else {
            Ok(None)
        }
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> LuminaResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_SUFFIX)?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        // First-of-month backups are kept on the monthly schedule
        is_monthly: created_at.day() == 1,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = stamp.split('-').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let (date_part, time_part) = (parts[0], parts[1]);
    let millis: u32 = match parts.get(2) {
        Some(ms) => ms.parse().ok()?,
        None => 0,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        date_part[0..4].parse().ok()?,
        date_part[4..6].parse().ok()?,
        date_part[6..8].parse().ok()?,
    )?;
    let time = NaiveTime::from_hms_milli_opt(
        time_part[0..2].parse().ok()?,
        time_part[2..4].parse().ok()?,
        time_part[4..6].parse().ok()?,
        millis,
    )?;

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}
