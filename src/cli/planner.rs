//! Planner CLI commands
//!
//! Positive reflections, to-do items and schedule blocks on an entry.

use std::fs;
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{LuminaError, LuminaResult};
use crate::services::JournalService;
use crate::storage::Storage;

use super::{match_id, resolve_entry};

/// Reflection subcommands
#[derive(Subcommand)]
pub enum ReflectionCommands {
    /// Set an entry's positive reflection
    Set {
        /// Entry ID or ID prefix
        entry: String,
        /// Uplifting quote
        quote: String,
        /// Image to store alongside the quote
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
}

/// To-do subcommands
#[derive(Subcommand)]
pub enum TodoCommands {
    /// Add a to-do item
    Add {
        /// Entry ID or ID prefix
        entry: String,
        /// What needs doing
        text: String,
    },
    /// Mark a to-do item done, or open again
    Toggle {
        /// Entry ID or ID prefix
        entry: String,
        /// To-do ID or ID prefix
        todo: String,
    },
}

/// Schedule subcommands
#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Add a block to an entry's schedule
    Add {
        /// Entry ID or ID prefix
        entry: String,
        /// Time of day, e.g. 09:30
        time: String,
        /// Activity
        activity: String,
    },
}

/// Handle a reflection command
pub fn handle_reflection_command(storage: &Storage, cmd: ReflectionCommands) -> LuminaResult<()> {
    let journal = JournalService::new(storage);

    match cmd {
        ReflectionCommands::Set {
            entry,
            quote,
            image,
        } => {
            let entry = resolve_entry(&journal, &entry)?;
            let image = match image {
                Some(path) => Some(fs::read(&path).map_err(|e| {
                    LuminaError::Io(format!("Failed to read {}: {}", path.display(), e))
                })?),
                None => None,
            };

            let reflection =
                journal.set_positive_reflection(&entry.id, &quote, image.as_deref())?;
            println!("✨ \"{}\"", reflection.quote);
            if reflection.image_ref.is_some() {
                println!("Image stored.");
            }
        }
    }

    Ok(())
}

/// Handle a to-do command
pub fn handle_todo_command(storage: &Storage, cmd: TodoCommands) -> LuminaResult<()> {
    let journal = JournalService::new(storage);

    match cmd {
        TodoCommands::Add { entry, text } => {
            let entry = resolve_entry(&journal, &entry)?;
            let todo = journal.add_todo(&entry.id, &text)?;
            println!("Added to-do {}: {}", todo.id.short(), todo.text);
        }

        TodoCommands::Toggle { entry, todo } => {
            let entry = resolve_entry(&journal, &entry)?;
            let target = match_id(
                &entry.todos,
                |t| t.id.as_str(),
                &todo,
                LuminaError::todo_not_found,
            )?;
            let toggled = journal.toggle_todo(&entry.id, &target.id)?;
            let state = if toggled.done { "done" } else { "open" };
            println!("{} is now {}", toggled.text, state);
        }
    }

    Ok(())
}

/// Handle a schedule command
pub fn handle_schedule_command(storage: &Storage, cmd: ScheduleCommands) -> LuminaResult<()> {
    let journal = JournalService::new(storage);

    match cmd {
        ScheduleCommands::Add {
            entry,
            time,
            activity,
        } => {
            let entry = resolve_entry(&journal, &entry)?;
            let block = journal.add_schedule_block(&entry.id, &time, &activity)?;
            println!("Scheduled {} at {}", block.activity, block.time);
        }
    }

    Ok(())
}
