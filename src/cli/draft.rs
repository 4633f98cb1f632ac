//! Draft CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::LuminaResult;
use crate::services::JournalService;
use crate::storage::Storage;

use super::resolve_entry;

/// Draft subcommands
#[derive(Subcommand)]
pub enum DraftCommands {
    /// Save in-progress text
    Save {
        /// Draft text
        text: String,
        /// Entry the draft edits (omit for a new entry)
        #[arg(short, long)]
        entry: Option<String>,
    },
    /// Show the saved draft
    Show,
    /// Discard the saved draft
    Clear,
}

/// Handle a draft command
pub fn handle_draft_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DraftCommands,
) -> LuminaResult<()> {
    let journal = JournalService::new(storage);

    match cmd {
        DraftCommands::Save { text, entry } => {
            let target = match entry {
                Some(identifier) => Some(resolve_entry(&journal, &identifier)?.id),
                None => None,
            };
            let draft = journal.save_draft(&text, target)?;
            println!(
                "Draft saved at {}",
                draft.saved_at.format(&settings.date_format)
            );
        }

        DraftCommands::Show => match journal.draft()? {
            Some(draft) => {
                match &draft.entry_id {
                    Some(id) => println!("Draft for entry {}", id.short()),
                    None => println!("Draft for a new entry"),
                }
                println!("Saved: {}", draft.saved_at.format(&settings.date_format));
                println!();
                println!("{}", draft.content);
            }
            None => println!("No saved draft."),
        },

        DraftCommands::Clear => {
            journal.clear_draft()?;
            println!("Draft cleared.");
        }
    }

    Ok(())
}
