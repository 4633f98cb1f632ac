//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod archive;
pub mod backup;
pub mod draft;
pub mod entry;
pub mod maintenance;
pub mod media;
pub mod planner;
pub mod report;

pub use archive::{handle_export_command, handle_import_command, handle_inspect_command};
pub use backup::{handle_backup_command, BackupCommands};
pub use draft::{handle_draft_command, DraftCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use maintenance::handle_gc_command;
pub use media::{handle_media_command, MediaCommands};
pub use planner::{
    handle_reflection_command, handle_schedule_command, handle_todo_command, ReflectionCommands,
    ScheduleCommands, TodoCommands,
};
pub use report::{handle_report_command, handle_streak_command, ReportCommands};

use crate::error::{LuminaError, LuminaResult};
use crate::models::JournalEntry;
use crate::services::JournalService;

/// Resolve an entry from a full ID or unambiguous prefix
pub(crate) fn resolve_entry(journal: &JournalService, identifier: &str) -> LuminaResult<JournalEntry> {
    journal
        .find(identifier)?
        .ok_or_else(|| LuminaError::entry_not_found(identifier))
}

/// Pick the single item whose ID equals or starts with `identifier`
pub(crate) fn match_id<'a, T>(
    items: &'a [T],
    id_of: impl Fn(&T) -> &str,
    identifier: &str,
    not_found: impl FnOnce(String) -> LuminaError,
) -> LuminaResult<&'a T> {
    let identifier = identifier.trim();
    if let Some(exact) = items.iter().find(|item| id_of(*item) == identifier) {
        return Ok(exact);
    }

    let mut matches = items
        .iter()
        .filter(|item| !identifier.is_empty() && id_of(*item).starts_with(identifier));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item),
        (Some(_), Some(_)) => Err(LuminaError::Validation(format!(
            "'{}' is ambiguous; use a longer ID",
            identifier
        ))),
        (None, _) => Err(not_found(identifier.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<String> {
        vec!["abc123".into(), "abd456".into(), "xyz".into()]
    }

    #[test]
    fn test_match_id_exact_and_prefix() {
        let items = ids();
        let found = match_id(&items, |s| s.as_str(), "abd", LuminaError::media_not_found).unwrap();
        assert_eq!(found, "abd456");

        let found = match_id(&items, |s| s.as_str(), "xyz", LuminaError::media_not_found).unwrap();
        assert_eq!(found, "xyz");
    }

    #[test]
    fn test_match_id_ambiguous_and_missing() {
        let items = ids();
        let err = match_id(&items, |s| s.as_str(), "ab", LuminaError::media_not_found).unwrap_err();
        assert!(err.is_validation());

        let err = match_id(&items, |s| s.as_str(), "q", LuminaError::media_not_found).unwrap_err();
        assert!(err.is_not_found());

        let err = match_id(&items, |s| s.as_str(), "", LuminaError::media_not_found).unwrap_err();
        assert!(err.is_not_found());
    }
}
