//! Unsaved editor draft

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::EntryId;

/// In-progress text kept so it survives an unplanned exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub content: String,

    /// Entry being edited, or `None` for a new entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<EntryId>,

    pub saved_at: DateTime<Utc>,
}

impl Draft {
    pub fn new(content: impl Into<String>, entry_id: Option<EntryId>) -> Self {
        Self {
            content: content.into(),
            entry_id,
            saved_at: Utc::now(),
        }
    }

    /// Whether this draft belongs to the given target (`None` = new entry)
    pub fn targets(&self, entry_id: Option<&EntryId>) -> bool {
        self.entry_id.as_ref() == entry_id
    }
}
