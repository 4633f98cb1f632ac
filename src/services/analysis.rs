//! Analysis service
//!
//! Mood analysis and the aggregate reports come from a [`JournalAnalyzer`].
//! The service applies its results to entries and the report caches. A
//! failed analysis leaves every piece of local state as it was.

use tracing::{info, warn};

use crate::error::{LuminaError, LuminaResult};
use crate::models::{
    DailyGuidance, EntryId, JournalEntry, LifeJourneyAnalysis, MoodAnalysis, PatternAnalysis,
};
use crate::storage::Storage;

/// Produces mood analyses and aggregate reports from entry text
pub trait JournalAnalyzer: Send + Sync {
    /// Analyse a single entry's text
    fn analyze_entry(&self, content: &str) -> LuminaResult<MoodAnalysis>;

    /// Find patterns across `entries`, newest first
    fn analyze_patterns(&self, entries: &[JournalEntry]) -> LuminaResult<PatternAnalysis>;

    /// Tell the long-range story of the whole journal, newest first
    fn analyze_journey(&self, entries: &[JournalEntry]) -> LuminaResult<LifeJourneyAnalysis>;

    /// Suggest a focus for today given recent entries, newest first
    fn daily_guidance(&self, entries: &[JournalEntry]) -> LuminaResult<DailyGuidance>;
}

/// Service that runs an analyzer and stores its results
pub struct AnalysisService<'a> {
    storage: &'a Storage,
    analyzer: &'a dyn JournalAnalyzer,
    window: usize,
}

impl<'a> AnalysisService<'a> {
    /// Create a new analysis service
    ///
    /// `window` is how many recent entries pattern analysis and guidance see.
    pub fn new(storage: &'a Storage, analyzer: &'a dyn JournalAnalyzer, window: usize) -> Self {
        Self {
            storage,
            analyzer,
            window: window.max(1),
        }
    }

    /// Analyse one entry and store the mood fields on it
    pub fn analyze_entry(&self, id: &EntryId) -> LuminaResult<JournalEntry> {
        let mut entry = self
            .storage
            .entries
            .get(id)?
            .ok_or_else(|| LuminaError::entry_not_found(id.to_string()))?;

        let analysis = self
            .analyzer
            .analyze_entry(&entry.content)
            .map_err(analysis_failed)?;

        entry.apply_analysis(&analysis);
        entry
            .validate()
            .map_err(|e| LuminaError::Analysis(format!("Analyzer returned invalid result: {}", e)))?;

        self.storage.entries.save_entry(entry.clone())?;
        info!(entry = %id.short(), score = analysis.mood_score, "analysed entry");
        Ok(entry)
    }

    /// Analyse every entry that has never been analysed
    ///
    /// Stops at the first failure; entries analysed before it keep their results.
    pub fn analyze_pending(&self) -> LuminaResult<usize> {
        let pending: Vec<EntryId> = self
            .storage
            .entries
            .get_all()?
            .into_iter()
            .filter(|e| !e.is_analyzed)
            .map(|e| e.id)
            .collect();

        for id in &pending {
            self.analyze_entry(id)?;
        }
        Ok(pending.len())
    }

    /// Regenerate the cached pattern analysis from the most recent entries
    pub fn refresh_patterns(&self) -> LuminaResult<PatternAnalysis> {
        let recent = self.recent_entries()?;
        let analysis = self
            .analyzer
            .analyze_patterns(&recent)
            .map_err(analysis_failed)?;

        self.storage.analysis.set(&analysis)?;
        Ok(analysis)
    }

    /// Regenerate the cached journey report from the whole journal
    pub fn refresh_journey(&self) -> LuminaResult<LifeJourneyAnalysis> {
        let entries = self.all_entries()?;
        let journey = self
            .analyzer
            .analyze_journey(&entries)
            .map_err(analysis_failed)?;

        self.storage.journey.set(&journey)?;
        Ok(journey)
    }

    /// Regenerate today's guidance from the most recent entries
    pub fn refresh_guidance(&self) -> LuminaResult<DailyGuidance> {
        let recent = self.recent_entries()?;
        let guidance = self
            .analyzer
            .daily_guidance(&recent)
            .map_err(analysis_failed)?;

        self.storage.guidance.set(&guidance)?;
        Ok(guidance)
    }

    /// Cached pattern analysis, if one has been generated
    pub fn patterns(&self) -> LuminaResult<Option<PatternAnalysis>> {
        self.storage.analysis.get()
    }

    /// Cached journey report, if one has been generated
    pub fn journey(&self) -> LuminaResult<Option<LifeJourneyAnalysis>> {
        self.storage.journey.get()
    }

    /// Cached guidance, if any has been generated
    pub fn guidance(&self) -> LuminaResult<Option<DailyGuidance>> {
        self.storage.guidance.get()
    }

    fn all_entries(&self) -> LuminaResult<Vec<JournalEntry>> {
        let mut entries = self.storage.entries.get_all()?;
        if entries.is_empty() {
            return Err(LuminaError::Validation(
                "Write at least one entry before generating reports".into(),
            ));
        }
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    fn recent_entries(&self) -> LuminaResult<Vec<JournalEntry>> {
        let mut entries = self.all_entries()?;
        entries.truncate(self.window);
        Ok(entries)
    }
}

fn analysis_failed(err: LuminaError) -> LuminaError {
    warn!(error = %err, "analyzer failed, local state unchanged");
    match err {
        LuminaError::Analysis(_) => err,
        other => LuminaError::Analysis(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LuminaPaths;
    use chrono::{Duration, Utc};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Analyzer returning canned results, optionally failing every call
    struct FakeAnalyzer {
        fail: bool,
        seen: Mutex<Vec<usize>>,
    }

    impl FakeAnalyzer {
        fn ok() -> Self {
            Self {
                fail: false,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn check(&self) -> LuminaResult<()> {
            if self.fail {
                Err(LuminaError::Analysis("service unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    impl JournalAnalyzer for FakeAnalyzer {
        fn analyze_entry(&self, _content: &str) -> LuminaResult<MoodAnalysis> {
            self.check()?;
            Ok(MoodAnalysis {
                mood_score: 8,
                mood_label: "Hopeful".into(),
                emoji: "🌤️".into(),
                color: "#ffcc00".into(),
                keywords: vec!["sun".into()],
                summary: "A bright day.".into(),
                reflection_question: "What made it bright?".into(),
            })
        }

        fn analyze_patterns(&self, entries: &[JournalEntry]) -> LuminaResult<PatternAnalysis> {
            self.check()?;
            self.seen.lock().unwrap().push(entries.len());
            Ok(PatternAnalysis {
                generated_at: Utc::now(),
                entry_count: entries.len(),
                dominant_moods: vec![],
                recurring_themes: vec![],
                mood_trend: "stable".into(),
                insights: vec![],
                suggestions: vec![],
            })
        }

        fn analyze_journey(&self, entries: &[JournalEntry]) -> LuminaResult<LifeJourneyAnalysis> {
            self.check()?;
            Ok(LifeJourneyAnalysis {
                generated_at: Utc::now(),
                title: format!("{} entries", entries.len()),
                chapters: vec![],
                growth_areas: vec![],
                narrative: String::new(),
            })
        }

        fn daily_guidance(&self, _entries: &[JournalEntry]) -> LuminaResult<DailyGuidance> {
            self.check()?;
            Ok(DailyGuidance {
                generated_at: Utc::now(),
                message: "Be gentle".into(),
                focus: "rest".into(),
                affirmation: "I am enough".into(),
            })
        }
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LuminaPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_analyze_entry_sets_fields() {
        let (_temp, storage) = create_test_storage();
        let analyzer = FakeAnalyzer::ok();
        let service = AnalysisService::new(&storage, &analyzer, 14);

        let entry = JournalEntry::new("sunny walk");
        storage.entries.save_entry(entry.clone()).unwrap();

        let analysed = service.analyze_entry(&entry.id).unwrap();
        assert!(analysed.is_analyzed);
        assert_eq!(analysed.mood_score, Some(8));

        let stored = storage.entries.get(&entry.id).unwrap().unwrap();
        assert_eq!(stored.mood_label.as_deref(), Some("Hopeful"));
    }

    #[test]
    fn test_failed_entry_analysis_changes_nothing() {
        let (_temp, storage) = create_test_storage();
        let analyzer = FakeAnalyzer::failing();
        let service = AnalysisService::new(&storage, &analyzer, 14);

        let entry = JournalEntry::new("cloudy");
        storage.entries.save_entry(entry.clone()).unwrap();

        let err = service.analyze_entry(&entry.id).unwrap_err();
        assert!(matches!(err, LuminaError::Analysis(_)));
        assert_eq!(storage.entries.get(&entry.id).unwrap().unwrap(), entry);
    }

    #[test]
    fn test_failed_refresh_keeps_cached_reports() {
        let (_temp, storage) = create_test_storage();
        storage.entries.save_entry(JournalEntry::new("text")).unwrap();

        let good = FakeAnalyzer::ok();
        let cached = AnalysisService::new(&storage, &good, 14).refresh_patterns().unwrap();

        let bad = FakeAnalyzer::failing();
        let service = AnalysisService::new(&storage, &bad, 14);
        assert!(service.refresh_patterns().is_err());
        assert!(service.refresh_journey().is_err());
        assert!(service.refresh_guidance().is_err());

        assert_eq!(service.patterns().unwrap(), Some(cached));
        assert!(service.journey().unwrap().is_none());
        assert!(service.guidance().unwrap().is_none());
    }

    #[test]
    fn test_patterns_use_recent_window() {
        let (_temp, storage) = create_test_storage();
        let now = Utc::now();
        for days in 0..5 {
            let entry = JournalEntry::with_created_at("day", now - Duration::days(days));
            storage.entries.save_entry(entry).unwrap();
        }

        let analyzer = FakeAnalyzer::ok();
        let service = AnalysisService::new(&storage, &analyzer, 3);
        let analysis = service.refresh_patterns().unwrap();

        assert_eq!(analysis.entry_count, 3);
        assert_eq!(*analyzer.seen.lock().unwrap(), vec![3]);
        assert_eq!(service.patterns().unwrap(), Some(analysis));
    }

    #[test]
    fn test_reports_need_entries() {
        let (_temp, storage) = create_test_storage();
        let analyzer = FakeAnalyzer::ok();
        let service = AnalysisService::new(&storage, &analyzer, 14);

        assert!(service.refresh_journey().unwrap_err().is_validation());
    }

    #[test]
    fn test_analyze_pending() {
        let (_temp, storage) = create_test_storage();
        let analyzer = FakeAnalyzer::ok();
        let service = AnalysisService::new(&storage, &analyzer, 14);

        storage.entries.save_entry(JournalEntry::new("one")).unwrap();
        storage.entries.save_entry(JournalEntry::new("two")).unwrap();

        assert_eq!(service.analyze_pending().unwrap(), 2);
        assert_eq!(service.analyze_pending().unwrap(), 0);
    }
}
