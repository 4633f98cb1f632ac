//! Journal service
//!
//! Business logic for writing entries: creation, editing, attachments,
//! planner items and draft recovery. Blobs are always written to the object
//! store before any entry references them.

use tracing::{debug, info};

use crate::error::{LuminaError, LuminaResult};
use crate::models::{
    BlobRef, Draft, EntryId, JournalEntry, JournalMedia, MediaId, MediaKind, PositiveReflection,
    ScheduleBlock, TodoId, TodoItem,
};
use crate::storage::Storage;

/// Service for journal entry management
pub struct JournalService<'a> {
    storage: &'a Storage,
}

impl<'a> JournalService<'a> {
    /// Create a new journal service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a new entry
    ///
    /// Clears the new-entry draft, since its text has now been saved.
    pub fn create_entry(&self, content: &str) -> LuminaResult<JournalEntry> {
        let entry = JournalEntry::new(content.trim());
        entry
            .validate()
            .map_err(|e| LuminaError::Validation(e.to_string()))?;

        self.storage.entries.save_entry(entry.clone())?;
        self.clear_draft_for(None)?;

        info!(entry = %entry.id.short(), "created entry");
        Ok(entry)
    }

    /// Replace an entry's text
    pub fn update_entry(&self, id: &EntryId, content: &str) -> LuminaResult<JournalEntry> {
        let entry = self.modify(id, |entry| {
            entry.set_content(content.trim());
            Ok(())
        })?;
        self.clear_draft_for(Some(id))?;
        Ok(entry)
    }

    /// Get an entry by ID
    pub fn get(&self, id: &EntryId) -> LuminaResult<Option<JournalEntry>> {
        self.storage.entries.get(id)
    }

    /// Find an entry by full ID or unambiguous ID prefix
    pub fn find(&self, identifier: &str) -> LuminaResult<Option<JournalEntry>> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }

        let mut matches: Vec<JournalEntry> = self
            .storage
            .entries
            .get_all()?
            .into_iter()
            .filter(|e| e.id.as_str().starts_with(identifier))
            .collect();

        if let Some(exact) = matches.iter().position(|e| e.id.as_str() == identifier) {
            return Ok(Some(matches.swap_remove(exact)));
        }

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(LuminaError::Validation(format!(
                "'{}' matches {} entries; use a longer ID",
                identifier, n
            ))),
        }
    }

    /// All entries, newest first
    pub fn list(&self) -> LuminaResult<Vec<JournalEntry>> {
        let mut entries = self.storage.entries.get_all()?;
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Delete an entry
    ///
    /// Blobs the entry referenced stay in the object store until an
    /// explicit orphan sweep.
    pub fn delete_entry(&self, id: &EntryId) -> LuminaResult<JournalEntry> {
        let entry = self.require(id)?;
        self.storage.entries.delete(id)?;
        info!(entry = %id.short(), "deleted entry");
        Ok(entry)
    }

    /// Store `content` as a new blob and attach it to an entry
    pub fn attach_media(
        &self,
        id: &EntryId,
        kind: MediaKind,
        mime_type: &str,
        content: &[u8],
    ) -> LuminaResult<JournalMedia> {
        // Fail before writing the blob if the entry is gone
        self.require(id)?;

        let blob = BlobRef::new();
        self.storage.blobs().put(&blob, content)?;
        debug!(blob = %blob, bytes = content.len(), "stored attachment");

        let media = JournalMedia::from_blob(kind, mime_type, blob);
        self.push_media(id, media)
    }

    /// Attach content hosted elsewhere
    pub fn attach_external_media(
        &self,
        id: &EntryId,
        kind: MediaKind,
        mime_type: &str,
        url: &str,
    ) -> LuminaResult<JournalMedia> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LuminaError::Validation("Media URL cannot be empty".into()));
        }
        self.push_media(id, JournalMedia::from_url(kind, mime_type, url))
    }

    fn push_media(&self, id: &EntryId, media: JournalMedia) -> LuminaResult<JournalMedia> {
        self.modify(id, |entry| {
            entry.media.push(media.clone());
            Ok(())
        })?;
        Ok(media)
    }

    /// Remove an attachment from an entry; the blob itself is kept
    pub fn detach_media(&self, id: &EntryId, media_id: &MediaId) -> LuminaResult<JournalMedia> {
        let mut removed = None;
        self.modify(id, |entry| {
            let index = entry
                .media
                .iter()
                .position(|m| &m.id == media_id)
                .ok_or_else(|| LuminaError::media_not_found(media_id.to_string()))?;
            removed = Some(entry.media.remove(index));
            Ok(())
        })?;
        removed.ok_or_else(|| LuminaError::media_not_found(media_id.to_string()))
    }

    /// Fetch an attachment's bytes
    ///
    /// Returns `None` for external media and for blobs missing from the store.
    pub fn media_content(
        &self,
        id: &EntryId,
        media_id: &MediaId,
    ) -> LuminaResult<Option<(JournalMedia, Vec<u8>)>> {
        let entry = self.require(id)?;
        let media = entry
            .media_item(media_id)
            .cloned()
            .ok_or_else(|| LuminaError::media_not_found(media_id.to_string()))?;

        let Some(blob) = media.blob_ref() else {
            return Ok(None);
        };
        Ok(self.storage.blobs().get(blob)?.map(|bytes| (media, bytes)))
    }

    /// Set or replace an entry's positive reflection
    ///
    /// `image` is stored as a blob first when given.
    pub fn set_positive_reflection(
        &self,
        id: &EntryId,
        quote: &str,
        image: Option<&[u8]>,
    ) -> LuminaResult<PositiveReflection> {
        let quote = quote.trim();
        if quote.is_empty() {
            return Err(LuminaError::Validation("Reflection quote cannot be empty".into()));
        }
        self.require(id)?;

        let image_ref = match image {
            Some(bytes) => {
                let blob = BlobRef::new();
                self.storage.blobs().put(&blob, bytes)?;
                Some(blob)
            }
            None => None,
        };

        let reflection = PositiveReflection {
            quote: quote.to_string(),
            image_ref,
        };
        self.modify(id, |entry| {
            entry.positive_reflection = Some(reflection.clone());
            Ok(())
        })?;
        Ok(reflection)
    }

    /// Add a to-do item to an entry
    pub fn add_todo(&self, id: &EntryId, text: &str) -> LuminaResult<TodoItem> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LuminaError::Validation("To-do text cannot be empty".into()));
        }

        let todo = TodoItem {
            id: TodoId::new(),
            text: text.to_string(),
            done: false,
        };
        self.modify(id, |entry| {
            entry.todos.push(todo.clone());
            Ok(())
        })?;
        Ok(todo)
    }

    /// Flip a to-do item between done and open
    pub fn toggle_todo(&self, id: &EntryId, todo_id: &TodoId) -> LuminaResult<TodoItem> {
        let mut toggled = None;
        self.modify(id, |entry| {
            let todo = entry
                .todos
                .iter_mut()
                .find(|t| &t.id == todo_id)
                .ok_or_else(|| LuminaError::todo_not_found(todo_id.to_string()))?;
            todo.done = !todo.done;
            toggled = Some(todo.clone());
            Ok(())
        })?;
        toggled.ok_or_else(|| LuminaError::todo_not_found(todo_id.to_string()))
    }

    /// Add a schedule block, keeping blocks ordered by time
    pub fn add_schedule_block(
        &self,
        id: &EntryId,
        time: &str,
        activity: &str,
    ) -> LuminaResult<ScheduleBlock> {
        let (time, activity) = (time.trim(), activity.trim());
        if time.is_empty() || activity.is_empty() {
            return Err(LuminaError::Validation(
                "Schedule blocks need both a time and an activity".into(),
            ));
        }

        let block = ScheduleBlock {
            time: time.to_string(),
            activity: activity.to_string(),
        };
        self.modify(id, |entry| {
            entry.schedule.push(block.clone());
            entry.schedule.sort_by(|a, b| a.time.cmp(&b.time));
            Ok(())
        })?;
        Ok(block)
    }

    /// Save in-progress text, replacing any previous draft
    pub fn save_draft(&self, content: &str, entry_id: Option<EntryId>) -> LuminaResult<Draft> {
        let draft = Draft::new(content, entry_id);
        self.storage.draft.set(&draft)?;
        Ok(draft)
    }

    /// Get the saved draft, if any
    pub fn draft(&self) -> LuminaResult<Option<Draft>> {
        self.storage.draft.get()
    }

    /// Discard the saved draft
    pub fn clear_draft(&self) -> LuminaResult<()> {
        self.storage.draft.clear()
    }

    fn clear_draft_for(&self, target: Option<&EntryId>) -> LuminaResult<()> {
        if let Some(draft) = self.storage.draft.get()? {
            if draft.targets(target) {
                self.storage.draft.clear()?;
                debug!("cleared draft after save");
            }
        }
        Ok(())
    }

    fn require(&self, id: &EntryId) -> LuminaResult<JournalEntry> {
        self.storage
            .entries
            .get(id)?
            .ok_or_else(|| LuminaError::entry_not_found(id.to_string()))
    }

    /// Load, mutate, validate and persist one entry
    fn modify<F>(&self, id: &EntryId, f: F) -> LuminaResult<JournalEntry>
    where
        F: FnOnce(&mut JournalEntry) -> LuminaResult<()>,
    {
        let mut entry = self.require(id)?;
        f(&mut entry)?;
        entry.updated_at = chrono::Utc::now();
        entry
            .validate()
            .map_err(|e| LuminaError::Validation(e.to_string()))?;

        self.storage.entries.save_entry(entry.clone())?;
        Ok(entry)
    }
}
