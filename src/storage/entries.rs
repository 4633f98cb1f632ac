//! Entry repository for JSON storage
//!
//! Manages the entry collection in entries.json. The collection is one JSON
//! array ordered newest first; every call re-reads the document and every
//! mutation rewrites it whole. There is no locking across processes, so two
//! concurrent writers can overwrite each other's changes.

use std::path::PathBuf;

use tracing::debug;

use crate::error::LuminaError;
use crate::models::{EntryId, JournalEntry};

use super::file_io::{read_json_lenient, write_json_atomic};

/// Repository for entry persistence
pub struct EntryRepository {
    path: PathBuf,
}

impl EntryRepository {
    /// Create a new entry repository
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get all entries, newest first
    ///
    /// A missing or unparsable document yields an empty list.
    pub fn get_all(&self) -> Result<Vec<JournalEntry>, LuminaError> {
        read_json_lenient(&self.path)
    }

    /// Get an entry by ID
    pub fn get(&self, id: &EntryId) -> Result<Option<JournalEntry>, LuminaError> {
        Ok(self.get_all()?.into_iter().find(|e| &e.id == id))
    }

    /// Insert or update an entry
    ///
    /// An existing entry with the same id is replaced at its current
    /// position; a new entry is prepended.
    pub fn save_entry(&self, entry: JournalEntry) -> Result<(), LuminaError> {
        let mut entries = self.get_all()?;

        match entries.iter().position(|e| e.id == entry.id) {
            Some(index) => {
                debug!(entry_id = %entry.id, index, "replacing entry in place");
                entries[index] = entry;
            }
            None => {
                debug!(entry_id = %entry.id, "prepending new entry");
                entries.insert(0, entry);
            }
        }

        write_json_atomic(&self.path, &entries)
    }

    /// Delete an entry, returning whether it existed
    pub fn delete(&self, id: &EntryId) -> Result<bool, LuminaError> {
        let mut entries = self.get_all()?;
        let before = entries.len();
        entries.retain(|e| &e.id != id);

        if entries.len() == before {
            return Ok(false);
        }

        write_json_atomic(&self.path, &entries)?;
        Ok(true)
    }

    /// Replace the whole collection
    pub fn replace_all(&self, entries: &[JournalEntry]) -> Result<(), LuminaError> {
        write_json_atomic(&self.path, &entries)
    }

    /// Count entries
    pub fn count(&self) -> Result<usize, LuminaError> {
        Ok(self.get_all()?.len())
    }
}
