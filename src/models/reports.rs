//! Cached aggregate reports
//!
//! Each report is a singleton slot: generating a new one replaces the old.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Patterns found across a window of recent entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysis {
    pub generated_at: DateTime<Utc>,

    /// Number of entries the analysis covered
    #[serde(default)]
    pub entry_count: usize,

    #[serde(default)]
    pub dominant_moods: Vec<String>,

    #[serde(default)]
    pub recurring_themes: Vec<String>,

    /// e.g. "improving", "stable", "declining"
    #[serde(default)]
    pub mood_trend: String,

    #[serde(default)]
    pub insights: Vec<String>,

    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// One chapter of the life-journey narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyChapter {
    pub title: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub summary: String,
}

/// Long-range narrative over the whole journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeJourneyAnalysis {
    pub generated_at: DateTime<Utc>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub chapters: Vec<JourneyChapter>,

    #[serde(default)]
    pub growth_areas: Vec<String>,

    #[serde(default)]
    pub narrative: String,
}

/// Short guidance for the day ahead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGuidance {
    pub generated_at: DateTime<Utc>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub focus: String,

    #[serde(default)]
    pub affirmation: String,
}
