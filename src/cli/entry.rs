//! Entry CLI commands
//!
//! Implements CLI commands for writing, reading and analysing entries.

use std::io::Read;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_entry_details, format_entry_list};
use crate::error::{LuminaError, LuminaResult};
use crate::services::{AnalysisService, JournalService, LexiconAnalyzer};
use crate::storage::Storage;

use super::resolve_entry;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Write a new entry
    Add {
        /// Entry text (read from stdin when omitted)
        text: Option<String>,
        /// Run mood analysis right after saving
        #[arg(short, long)]
        analyze: bool,
    },
    /// List entries, newest first
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show an entry in full
    Show {
        /// Entry ID or ID prefix
        entry: String,
    },
    /// Replace an entry's text
    Edit {
        /// Entry ID or ID prefix
        entry: String,
        /// New text (read from stdin when omitted)
        text: Option<String>,
    },
    /// Delete an entry
    Delete {
        /// Entry ID or ID prefix
        entry: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Analyse an entry's mood, or every unanalysed entry with --pending
    Analyze {
        /// Entry ID or ID prefix
        #[arg(required_unless_present = "pending")]
        entry: Option<String>,
        /// Analyse every entry that has not been analysed yet
        #[arg(long)]
        pending: bool,
    },
}

/// Take text from the argument or, failing that, from stdin
fn text_or_stdin(text: Option<String>) -> LuminaResult<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| LuminaError::Io(format!("Failed to read entry from stdin: {}", e)))?;
            Ok(buf)
        }
    }
}

/// Handle an entry command
pub fn handle_entry_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EntryCommands,
) -> LuminaResult<()> {
    let journal = JournalService::new(storage);
    let analyzer = LexiconAnalyzer::new();
    let analysis = AnalysisService::new(storage, &analyzer, settings.analysis_window);

    match cmd {
        EntryCommands::Add { text, analyze } => {
            let text = text_or_stdin(text)?;
            let mut entry = journal.create_entry(&text)?;
            if analyze {
                entry = analysis.analyze_entry(&entry.id)?;
            }

            println!("Saved entry {}", entry.id.short());
            if let (Some(emoji), Some(label)) = (&entry.emoji, &entry.mood_label) {
                println!("Mood: {} {}", emoji, label);
            }
        }

        EntryCommands::List { limit } => {
            let mut entries = journal.list()?;
            entries.truncate(limit);
            print!("{}", format_entry_list(&entries, &settings.date_format));
        }

        EntryCommands::Show { entry } => {
            let entry = resolve_entry(&journal, &entry)?;
            print!("{}", format_entry_details(&entry, &settings.date_format));
        }

        EntryCommands::Edit { entry, text } => {
            let existing = resolve_entry(&journal, &entry)?;
            let text = text_or_stdin(text)?;
            let updated = journal.update_entry(&existing.id, &text)?;
            println!("Updated entry {}", updated.id.short());
        }

        EntryCommands::Delete { entry, force } => {
            let existing = resolve_entry(&journal, &entry)?;

            if !force {
                println!("About to delete entry {}:", existing.id.short());
                println!("  {}", existing.preview(60));
                println!();
                println!("To proceed, run again with --force flag:");
                println!("  lumina entry delete {} --force", entry);
                return Ok(());
            }

            journal.delete_entry(&existing.id)?;
            println!("Deleted entry {}", existing.id.short());
            if existing.blob_refs().next().is_some() {
                println!("Its media stays on disk until you run `lumina gc`.");
            }
        }

        EntryCommands::Analyze { entry, pending } => {
            if pending {
                let count = analysis.analyze_pending()?;
                println!("Analysed {} entries.", count);
            } else if let Some(entry) = entry {
                let existing = resolve_entry(&journal, &entry)?;
                let analysed = analysis.analyze_entry(&existing.id)?;
                print!("{}", format_entry_details(&analysed, &settings.date_format));
            }
        }
    }

    Ok(())
}
