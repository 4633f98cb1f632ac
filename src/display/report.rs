//! Report formatting for terminal output

use crate::archive::{ArchiveInfo, BackupInfo};
use crate::models::{DailyGuidance, LifeJourneyAnalysis, PatternAnalysis};
use crate::services::SweepReport;

/// Format a header line with padding
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = if len >= width { 0 } else { (width - len) / 2 };
    format!("{}{}", " ".repeat(padding), title)
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

fn bullet_list(output: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    output.push_str(&format!("\n{}\n", heading));
    for item in items {
        output.push_str(&format!("  • {}\n", item));
    }
}

/// Format the cached pattern analysis
pub fn format_patterns(analysis: &PatternAnalysis) -> String {
    let mut output = String::new();
    output.push_str(&format_header("Mood Patterns", 50));
    output.push('\n');
    output.push_str(&separator(50));
    output.push('\n');

    output.push_str(&format!("Entries analysed: {}\n", analysis.entry_count));
    output.push_str(&format!("Trend:            {}\n", analysis.mood_trend));
    if !analysis.dominant_moods.is_empty() {
        output.push_str(&format!(
            "Dominant moods:   {}\n",
            analysis.dominant_moods.join(", ")
        ));
    }
    if !analysis.recurring_themes.is_empty() {
        output.push_str(&format!(
            "Themes:           {}\n",
            analysis.recurring_themes.join(", ")
        ));
    }

    bullet_list(&mut output, "Insights", &analysis.insights);
    bullet_list(&mut output, "Suggestions", &analysis.suggestions);
    output
}

/// Format the cached journey report
pub fn format_journey(journey: &LifeJourneyAnalysis) -> String {
    let mut output = String::new();
    output.push_str(&format_header(&journey.title, 50));
    output.push('\n');
    output.push_str(&separator(50));
    output.push('\n');

    for (i, chapter) in journey.chapters.iter().enumerate() {
        output.push_str(&format!("{}. {} ({})\n", i + 1, chapter.title, chapter.period));
        if !chapter.summary.is_empty() {
            output.push_str(&format!("   {}\n", chapter.summary));
        }
    }

    bullet_list(&mut output, "Growth areas", &journey.growth_areas);

    if !journey.narrative.is_empty() {
        output.push_str(&format!("\n{}\n", journey.narrative));
    }
    output
}

/// Format today's guidance
pub fn format_guidance(guidance: &DailyGuidance) -> String {
    format!(
        "{}\n\nFocus:       {}\nAffirmation: {}\n",
        guidance.message, guidance.focus, guidance.affirmation
    )
}

/// Format a streak count
pub fn format_streak(streak: u32) -> String {
    match streak {
        0 => "No current streak. Write today to start one.".to_string(),
        1 => "🔥 1 day streak".to_string(),
        n => format!("🔥 {} day streak", n),
    }
}

/// Format what an archive contains
pub fn format_archive_info(info: &ArchiveInfo) -> String {
    let mut output = String::new();
    output.push_str(&format!("Format version: {}\n", info.format_version));
    output.push_str(&format!(
        "Exported:       {}\n",
        info.exported_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if info.has_entries {
        output.push_str(&format!("Entries:        {}\n", info.entry_count));
    } else {
        output.push_str("Entries:        (not included)\n");
    }
    output.push_str(&format!(
        "Reports:        analysis {}, journey {}\n",
        if info.has_analysis { "yes" } else { "no" },
        if info.has_journey { "yes" } else { "no" }
    ));
    output.push_str(&format!("Media files:    {}\n", info.media_count));
    if !info.is_complete() {
        output.push_str(&format!(
            "Missing media:  {} referenced blob(s) not in archive\n",
            info.missing_media.len()
        ));
    }
    output
}

/// Format a list of backups
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("{:<45} {:>10}  {}\n", "Backup", "Size", "Created"));
    output.push_str(&format!("{:-<45} {:->10}  {:-<20}\n", "", "", ""));

    for backup in backups {
        let monthly = if backup.is_monthly { " (monthly)" } else { "" };
        output.push_str(&format!(
            "{:<45} {:>10}  {}{}\n",
            backup.filename,
            format_size(backup.size_bytes),
            backup.created_at.format("%Y-%m-%d %H:%M:%S"),
            monthly
        ));
    }
    output
}

/// Format an orphan sweep result
pub fn format_sweep_report(report: &SweepReport) -> String {
    if report.orphaned.is_empty() {
        return "No orphaned media found.".to_string();
    }

    let verb = if report.dry_run { "Would remove" } else { "Removed" };
    let mut output = format!(
        "{} {} orphaned media file(s), {}\n",
        verb,
        report.orphaned.len(),
        format_size(report.reclaimed_bytes)
    );
    for key in &report.orphaned {
        output.push_str(&format!("  {}\n", key));
    }
    output
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
