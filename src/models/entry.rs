//! Journal entry model
//!
//! An entry is free text plus optional AI-derived mood fields, an optional
//! positive reflection, attached media and planner items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::blob_ref::BlobRef;
use super::ids::{EntryId, MediaId, TodoId};
use super::media::JournalMedia;

/// Mood fields produced by analysing a single entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodAnalysis {
    pub mood_score: u8,
    pub mood_label: String,
    pub emoji: String,
    pub color: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub summary: String,
    pub reflection_question: String,
}

/// An uplifting quote with an optional generated illustration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositiveReflection {
    pub quote: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<BlobRef>,
}

/// A planner to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

/// A planner schedule block, e.g. "09:00 Deep work"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub time: String,
    pub activity: String,
}

/// A journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Unique identifier
    pub id: EntryId,

    /// Free text written by the user
    pub content: String,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last modified
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_score: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_question: Option<String>,

    /// True once the mood fields have been populated
    #[serde(default)]
    pub is_analyzed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_reflection: Option<PositiveReflection>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<JournalMedia>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub todos: Vec<TodoItem>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleBlock>,
}

impl JournalEntry {
    /// Create a new, unanalysed entry
    pub fn new(content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            mood_score: None,
            mood_label: None,
            emoji: None,
            color: None,
            keywords: None,
            summary: None,
            reflection_question: None,
            is_analyzed: false,
            positive_reflection: None,
            media: Vec::new(),
            todos: Vec::new(),
            schedule: Vec::new(),
        }
    }

    /// Create an entry with an explicit creation time (imports, tests)
    pub fn with_created_at(content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let mut entry = Self::new(content);
        entry.created_at = created_at;
        entry.updated_at = created_at;
        entry
    }

    /// Replace the text and bump the modification time
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Populate the mood fields from an analysis result
    pub fn apply_analysis(&mut self, analysis: &MoodAnalysis) {
        self.mood_score = Some(analysis.mood_score);
        self.mood_label = Some(analysis.mood_label.clone());
        self.emoji = Some(analysis.emoji.clone());
        self.color = Some(analysis.color.clone());
        self.keywords = Some(analysis.keywords.clone());
        self.summary = Some(analysis.summary.clone());
        self.reflection_question = Some(analysis.reflection_question.clone());
        self.is_analyzed = true;
        self.updated_at = Utc::now();
    }

    /// Find an attached media item
    pub fn media_item(&self, id: &MediaId) -> Option<&JournalMedia> {
        self.media.iter().find(|m| &m.id == id)
    }

    /// Every blob reference held by this entry
    ///
    /// Covers the reflection image and blob-backed media; external URLs are
    /// not blobs and never appear.
    pub fn blob_refs(&self) -> impl Iterator<Item = &BlobRef> {
        self.positive_reflection
            .iter()
            .filter_map(|r| r.image_ref.as_ref())
            .chain(self.media.iter().filter_map(|m| m.blob_ref()))
    }

    /// Short preview of the content for list views
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or("").trim();
        if first_line.chars().count() <= max_chars {
            first_line.to_string()
        } else {
            let truncated: String = first_line.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{}…", truncated)
        }
    }

    /// Validate the entry
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.content.trim().is_empty() {
            return Err(EntryValidationError::EmptyContent);
        }

        if let Some(score) = self.mood_score {
            if !(1..=10).contains(&score) {
                return Err(EntryValidationError::MoodScoreOutOfRange(score));
            }
        }

        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(EntryValidationError::InvalidColor(color.clone()));
            }
        }

        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Validation errors for entries
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    EmptyContent,
    MoodScoreOutOfRange(u8),
    InvalidColor(String),
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "Entry content cannot be empty"),
            Self::MoodScoreOutOfRange(score) => {
                write!(f, "Mood score must be between 1 and 10, got {}", score)
            }
            Self::InvalidColor(color) => write!(f, "Invalid hex color: {}", color),
        }
    }
}

impl std::error::Error for EntryValidationError {}
