//! Entry display formatting
//!
//! Formats journal entries for terminal output in list and detail views.

use crate::models::{JournalEntry, MediaSource};

/// Format a list of entries as a table
pub fn format_entry_list(entries: &[JournalEntry], date_format: &str) -> String {
    if entries.is_empty() {
        return "No entries yet. Write one with `lumina entry add`.".to_string();
    }

    let dates: Vec<String> = entries
        .iter()
        .map(|e| e.created_at.format(date_format).to_string())
        .collect();
    let date_width = dates.iter().map(|d| d.chars().count()).max().unwrap_or(4).max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<date_width$}  {:<4}  {}\n",
        "ID",
        "Date",
        "Mood",
        "Preview",
        date_width = date_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<date_width$}  {:-<4}  {:-<40}\n",
        "",
        "",
        "",
        "",
        date_width = date_width,
    ));

    for (entry, date) in entries.iter().zip(&dates) {
        let mood = entry
            .mood_score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if entry.media.is_empty() { "" } else { " 📎" };

        output.push_str(&format!(
            "{:<8}  {:<date_width$}  {:<4}  {}{}\n",
            entry.id.short(),
            date,
            mood,
            entry.preview(50),
            marker,
            date_width = date_width,
        ));
    }

    output.push_str(&format!("\n{} entries\n", entries.len()));
    output
}

/// Format a single entry's details
pub fn format_entry_details(entry: &JournalEntry, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Entry {}\n", entry.id));
    output.push_str(&format!(
        "  Created:  {}\n",
        entry.created_at.format(date_format)
    ));
    if entry.updated_at != entry.created_at {
        output.push_str(&format!(
            "  Updated:  {}\n",
            entry.updated_at.format(date_format)
        ));
    }

    if entry.is_analyzed {
        let mood = match (&entry.emoji, &entry.mood_label, entry.mood_score) {
            (Some(emoji), Some(label), Some(score)) => format!("{} {} ({}/10)", emoji, label, score),
            (_, Some(label), _) => label.clone(),
            _ => "analysed".to_string(),
        };
        output.push_str(&format!("  Mood:     {}\n", mood));
        if let Some(keywords) = entry.keywords.as_ref().filter(|k| !k.is_empty()) {
            output.push_str(&format!("  Keywords: {}\n", keywords.join(", ")));
        }
    }

    output.push('\n');
    for line in entry.content.lines() {
        output.push_str(&format!("  {}\n", line));
    }

    if let Some(summary) = &entry.summary {
        output.push_str(&format!("\n  Summary: {}\n", summary));
    }
    if let Some(question) = &entry.reflection_question {
        output.push_str(&format!("  Reflect: {}\n", question));
    }

    if let Some(reflection) = &entry.positive_reflection {
        output.push_str(&format!("\n  ✨ \"{}\"", reflection.quote));
        if reflection.image_ref.is_some() {
            output.push_str(" (with image)");
        }
        output.push('\n');
    }

    if !entry.media.is_empty() {
        output.push_str("\n  Media:\n");
        for media in &entry.media {
            let location = match &media.source {
                MediaSource::Blob(blob) => format!("blob {}", blob),
                MediaSource::External(url) => url.clone(),
            };
            output.push_str(&format!(
                "    {}  {:<8} {:<12} {}\n",
                media.id.short(),
                media.kind,
                media.mime_type,
                location
            ));
        }
    }

    if !entry.todos.is_empty() {
        output.push_str("\n  To-do:\n");
        for todo in &entry.todos {
            let check = if todo.done { "x" } else { " " };
            output.push_str(&format!("    [{}] {}  {}\n", check, todo.id.short(), todo.text));
        }
    }

    if !entry.schedule.is_empty() {
        output.push_str("\n  Schedule:\n");
        for block in &entry.schedule {
            output.push_str(&format!("    {:<6} {}\n", block.time, block.activity));
        }
    }

    output
}
