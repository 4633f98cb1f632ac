//! Offline word-list analyzer
//!
//! Scores mood by counting positive and negative words and derives the
//! aggregate reports from those scores. Used when no remote analyzer is
//! configured; it needs no network and is deterministic.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::{LuminaError, LuminaResult};
use crate::models::{
    DailyGuidance, JournalEntry, JourneyChapter, LifeJourneyAnalysis, MoodAnalysis,
    PatternAnalysis,
};

use super::analysis::JournalAnalyzer;

const POSITIVE: &[&str] = &[
    "happy", "grateful", "calm", "excited", "love", "loved", "proud", "good", "great", "joy",
    "peaceful", "relaxed", "hopeful", "fun", "laughed", "wonderful", "energized", "thankful",
    "progress", "win", "enjoyed", "beautiful", "rested", "accomplished",
];

const NEGATIVE: &[&str] = &[
    "sad", "tired", "angry", "anxious", "stressed", "worried", "lonely", "bad", "awful", "cried",
    "frustrated", "upset", "scared", "exhausted", "overwhelmed", "hurt", "sick", "lost", "failed",
    "annoyed", "nervous", "afraid", "bored", "drained",
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "a", "an", "to", "of", "in", "on", "at", "for", "with", "was", "is", "it", "i",
    "me", "my", "we", "our", "you", "he", "she", "they", "them", "that", "this", "but", "so",
    "just", "had", "have", "has", "be", "been", "am", "are", "were", "did", "do", "not", "no",
    "very", "really", "about", "from", "then", "than", "today", "got", "get", "some", "all",
    "out", "up", "what", "when", "felt", "feel", "feeling", "bit",
];

/// Word-list based [`JournalAnalyzer`]
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .map(|w| w.trim_matches('\'').to_lowercase())
}

/// Mood score in 1..=10, 5 when no mood words appear
fn score_text(text: &str) -> u8 {
    let (mut pos, mut neg) = (0i32, 0i32);
    for word in words(text) {
        if POSITIVE.contains(&word.as_str()) {
            pos += 1;
        } else if NEGATIVE.contains(&word.as_str()) {
            neg += 1;
        }
    }
    (5 + pos - neg).clamp(1, 10) as u8
}

fn entry_score(entry: &JournalEntry) -> u8 {
    entry.mood_score.unwrap_or_else(|| score_text(&entry.content))
}

fn label_for(score: u8) -> (&'static str, &'static str, &'static str) {
    match score {
        1..=2 => ("Heavy", "😞", "#4a5568"),
        3..=4 => ("Low", "😔", "#718096"),
        5..=6 => ("Steady", "🙂", "#63b3ed"),
        7..=8 => ("Bright", "😊", "#f6ad55"),
        _ => ("Radiant", "🤩", "#f6e05e"),
    }
}

/// Most frequent content words, ties broken alphabetically
fn top_keywords<'e>(texts: impl Iterator<Item = &'e str>, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in words(text) {
            if word.chars().count() > 2 && !STOP_WORDS.contains(&word.as_str()) {
                *counts.entry(word).or_default() += 1;
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(w, _)| w).collect()
}

fn first_sentence(text: &str) -> String {
    let trimmed = text.trim();
    let end = trimmed
        .find(&['.', '!', '?', '\n'][..])
        .map_or(trimmed.len(), |i| i + 1);
    let sentence: String = trimmed[..end].trim().chars().take(140).collect();
    sentence
}

fn mean(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|&s| f64::from(s)).sum::<f64>() / scores.len() as f64
}

/// Compare the older half of the scores (oldest first) with the newer half
fn trend(scores_oldest_first: &[u8]) -> &'static str {
    if scores_oldest_first.len() < 2 {
        return "stable";
    }
    let mid = scores_oldest_first.len() / 2;
    let delta = mean(&scores_oldest_first[mid..]) - mean(&scores_oldest_first[..mid]);
    if delta > 0.5 {
        "improving"
    } else if delta < -0.5 {
        "declining"
    } else {
        "stable"
    }
}

fn no_entries() -> LuminaError {
    LuminaError::Analysis("No entries to analyse".into())
}

impl JournalAnalyzer for LexiconAnalyzer {
    fn analyze_entry(&self, content: &str) -> LuminaResult<MoodAnalysis> {
        if content.trim().is_empty() {
            return Err(LuminaError::Analysis("Cannot analyse an empty entry".into()));
        }

        let score = score_text(content);
        let (label, emoji, color) = label_for(score);
        let keywords = top_keywords(std::iter::once(content), 5);
        let question = match keywords.first() {
            Some(word) => format!("What does \"{}\" mean to you right now?", word),
            None => "What would make tomorrow feel a little lighter?".to_string(),
        };

        Ok(MoodAnalysis {
            mood_score: score,
            mood_label: label.to_string(),
            emoji: emoji.to_string(),
            color: color.to_string(),
            keywords,
            summary: first_sentence(content),
            reflection_question: question,
        })
    }

    fn analyze_patterns(&self, entries: &[JournalEntry]) -> LuminaResult<PatternAnalysis> {
        if entries.is_empty() {
            return Err(no_entries());
        }

        let mut scores: Vec<u8> = entries.iter().map(entry_score).collect();
        scores.reverse();

        let mut label_counts: HashMap<&'static str, usize> = HashMap::new();
        for &score in &scores {
            *label_counts.entry(label_for(score).0).or_default() += 1;
        }
        let mut dominant: Vec<(&str, usize)> = label_counts.into_iter().collect();
        dominant.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let themes = top_keywords(entries.iter().map(|e| e.content.as_str()), 5);
        let mood_trend = trend(&scores);
        let average = mean(&scores);

        let mut insights = vec![format!(
            "Average mood across {} entries is {:.1}/10.",
            entries.len(),
            average
        )];
        if let Some(theme) = themes.first() {
            insights.push(format!("\"{}\" comes up more than anything else.", theme));
        }

        let suggestions = match mood_trend {
            "declining" => vec![
                "Your mood has dipped lately; schedule something restorative.".to_string(),
            ],
            "improving" => vec!["Notice what has been helping and keep doing it.".to_string()],
            _ => vec!["Try writing about one small win each day.".to_string()],
        };

        Ok(PatternAnalysis {
            generated_at: Utc::now(),
            entry_count: entries.len(),
            dominant_moods: dominant.into_iter().take(3).map(|(l, _)| l.to_string()).collect(),
            recurring_themes: themes,
            mood_trend: mood_trend.to_string(),
            insights,
            suggestions,
        })
    }

    fn analyze_journey(&self, entries: &[JournalEntry]) -> LuminaResult<LifeJourneyAnalysis> {
        if entries.is_empty() {
            return Err(no_entries());
        }

        let mut oldest_first: Vec<&JournalEntry> = entries.iter().collect();
        oldest_first.sort_by_key(|e| e.created_at);

        // One chapter per calendar month
        let mut chapters: Vec<(String, Vec<&JournalEntry>)> = Vec::new();
        for entry in oldest_first {
            let period = entry.created_at.format("%B %Y").to_string();
            match chapters.last_mut() {
                Some((p, group)) if *p == period => group.push(entry),
                _ => chapters.push((period, vec![entry])),
            }
        }

        let chapters: Vec<JourneyChapter> = chapters
            .into_iter()
            .map(|(period, group)| {
                let scores: Vec<u8> = group.iter().map(|e| entry_score(e)).collect();
                let themes = top_keywords(group.iter().map(|e| e.content.as_str()), 3);
                let (label, _, _) = label_for(mean(&scores).round() as u8);
                JourneyChapter {
                    title: format!("A {} stretch", label.to_lowercase()),
                    period,
                    summary: format!(
                        "{} entries, mostly about {}.",
                        group.len(),
                        if themes.is_empty() {
                            "everyday life".to_string()
                        } else {
                            themes.join(", ")
                        }
                    ),
                }
            })
            .collect();

        let growth_areas = top_keywords(entries.iter().map(|e| e.content.as_str()), 3);
        let narrative = format!(
            "Across {} entries and {} chapters, your journal has moved through {}.",
            entries.len(),
            chapters.len(),
            chapters
                .iter()
                .map(|c| c.title.to_lowercase())
                .collect::<Vec<_>>()
                .join(", then ")
        );

        Ok(LifeJourneyAnalysis {
            generated_at: Utc::now(),
            title: "Your journey so far".to_string(),
            chapters,
            growth_areas,
            narrative,
        })
    }

    fn daily_guidance(&self, entries: &[JournalEntry]) -> LuminaResult<DailyGuidance> {
        let latest = entries.first().ok_or_else(no_entries)?;
        let score = entry_score(latest);
        let focus = top_keywords(std::iter::once(latest.content.as_str()), 1)
            .pop()
            .unwrap_or_else(|| "yourself".to_string());

        let (message, affirmation) = if score <= 4 {
            (
                "Yesterday was heavy. Keep today small and kind.",
                "I am allowed to go slowly.",
            )
        } else if score >= 7 {
            (
                "You are carrying good momentum. Share some of it.",
                "I build on what is working.",
            )
        } else {
            (
                "A steady day is a good base. Pick one thing to move forward.",
                "Small steps still count.",
            )
        };

        Ok(DailyGuidance {
            generated_at: Utc::now(),
            message: message.to_string(),
            focus,
            affirmation: affirmation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_score_text() {
        assert_eq!(score_text("nothing much happened"), 5);
        assert_eq!(score_text("Happy and grateful, such a great day"), 8);
        assert_eq!(score_text("tired, stressed, anxious, sad, upset, hurt"), 1);
    }

    #[test]
    fn test_analyze_entry_is_valid() {
        let analysis = LexiconAnalyzer
            .analyze_entry("Felt calm after the run. Running helps.")
            .unwrap();

        let mut entry = JournalEntry::new("Felt calm after the run. Running helps.");
        entry.apply_analysis(&analysis);
        entry.validate().unwrap();

        assert_eq!(analysis.summary, "Felt calm after the run.");
        assert!(analysis.keywords.contains(&"run".to_string()));
    }

    #[test]
    fn test_analyze_empty_entry_fails() {
        assert!(LexiconAnalyzer.analyze_entry("  ").is_err());
    }

    #[test]
    fn test_trend() {
        assert_eq!(trend(&[3, 3, 8, 8]), "improving");
        assert_eq!(trend(&[8, 8, 3, 3]), "declining");
        assert_eq!(trend(&[5, 5, 5]), "stable");
        assert_eq!(trend(&[5]), "stable");
    }

    #[test]
    fn test_patterns() {
        let entries = vec![
            JournalEntry::new("great run, happy"),
            JournalEntry::new("run felt good"),
            JournalEntry::new("tired"),
        ];
        let analysis = LexiconAnalyzer.analyze_patterns(&entries).unwrap();

        assert_eq!(analysis.entry_count, 3);
        assert_eq!(analysis.recurring_themes.first().map(String::as_str), Some("run"));
        assert_eq!(analysis.mood_trend, "improving");
    }

    #[test]
    fn test_journey_chapters_by_month() {
        let entries = vec![
            JournalEntry::with_created_at("new job", Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()),
            JournalEntry::with_created_at("moving", Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap()),
            JournalEntry::with_created_at("boxes", Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap()),
        ];
        let journey = LexiconAnalyzer.analyze_journey(&entries).unwrap();

        let periods: Vec<&str> = journey.chapters.iter().map(|c| c.period.as_str()).collect();
        assert_eq!(periods, vec!["January 2024", "March 2024"]);
    }

    #[test]
    fn test_guidance_follows_latest_mood() {
        let low = vec![JournalEntry::new("sad tired exhausted")];
        let guidance = LexiconAnalyzer.daily_guidance(&low).unwrap();
        assert!(guidance.message.contains("heavy"));

        assert!(LexiconAnalyzer.daily_guidance(&[]).is_err());
    }
}
