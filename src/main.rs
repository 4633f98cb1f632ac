use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lumina::cli::{
    handle_backup_command, handle_draft_command, handle_entry_command, handle_export_command,
    handle_gc_command, handle_import_command, handle_inspect_command, handle_media_command,
    handle_reflection_command, handle_report_command, handle_schedule_command,
    handle_streak_command, handle_todo_command,
};
use lumina::config::{paths::LuminaPaths, settings::Settings};
use lumina::storage::Storage;

#[derive(Parser)]
#[command(
    name = "lumina",
    version,
    about = "Local-first personal journal",
    long_about = "Lumina is a local-first journal. Entries, media attachments and \
                  mood reports stay on your machine, and the whole journal can be \
                  exported to a single portable archive."
)]
struct Cli {
    /// Data directory (defaults to the platform config directory)
    #[arg(long, global = true, env = "LUMINA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new journal
    Init,

    /// Show current configuration and paths
    Config,

    /// Write, read and analyse entries
    #[command(subcommand)]
    Entry(lumina::cli::EntryCommands),

    /// Attach and extract media
    #[command(subcommand)]
    Media(lumina::cli::MediaCommands),

    /// Positive reflections
    #[command(subcommand)]
    Reflection(lumina::cli::ReflectionCommands),

    /// To-do items on an entry
    #[command(subcommand)]
    Todo(lumina::cli::TodoCommands),

    /// Schedule blocks on an entry
    #[command(subcommand)]
    Schedule(lumina::cli::ScheduleCommands),

    /// Unsaved draft recovery
    #[command(subcommand)]
    Draft(lumina::cli::DraftCommands),

    /// Show the current writing streak
    Streak {
        /// Day boundary rule (elapsed, calendar); defaults to the setting
        #[arg(short, long)]
        boundary: Option<String>,
    },

    /// Mood patterns, journey and guidance reports
    #[command(subcommand)]
    Report(lumina::cli::ReportCommands),

    /// Export the journal to a .tar.gz archive
    Export {
        /// Output file
        path: PathBuf,
    },

    /// Replace the journal with an archive's contents
    Import {
        /// Archive file
        path: PathBuf,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show what an archive contains
    Inspect {
        /// Archive file
        path: PathBuf,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(lumina::cli::BackupCommands),

    /// Delete media that no entry references
    Gc {
        /// Only report what would be deleted
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => LuminaPaths::with_base_dir(dir),
        None => LuminaPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    lumina::logging::init(&settings);

    // Inspecting an archive never touches the journal
    if let Some(Commands::Inspect { path }) = &cli.command {
        handle_inspect_command(path)?;
        return Ok(());
    }

    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Lumina at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Write your first entry with: lumina entry add \"...\"");
        }
        Some(Commands::Config) => {
            println!("Lumina Configuration");
            println!("====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Blob directory:   {}", paths.blob_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Log level:          {}", settings.log_level);
            println!("  Streak boundary:    {:?}", settings.streak_day_boundary);
            println!("  Analysis window:    {} entries", settings.analysis_window);
            println!("  Date format:        {}", settings.date_format);
            println!(
                "  Backup retention:   {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }
        Some(Commands::Entry(cmd)) => handle_entry_command(&storage, &settings, cmd)?,
        Some(Commands::Media(cmd)) => handle_media_command(&storage, cmd)?,
        Some(Commands::Reflection(cmd)) => handle_reflection_command(&storage, cmd)?,
        Some(Commands::Todo(cmd)) => handle_todo_command(&storage, cmd)?,
        Some(Commands::Schedule(cmd)) => handle_schedule_command(&storage, cmd)?,
        Some(Commands::Draft(cmd)) => handle_draft_command(&storage, &settings, cmd)?,
        Some(Commands::Streak { boundary }) => {
            handle_streak_command(&storage, &settings, boundary)?
        }
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export { path }) => handle_export_command(&storage, &path)?,
        Some(Commands::Import { path, force }) => {
            handle_import_command(&storage, &settings, &path, force)?
        }
        Some(Commands::Inspect { .. }) => {}
        Some(Commands::Backup(cmd)) => handle_backup_command(&storage, &settings, cmd)?,
        Some(Commands::Gc { dry_run }) => handle_gc_command(&storage, dry_run)?,
        None => {
            println!("Lumina - local-first personal journal");
            println!();
            println!("Run 'lumina --help' for usage information.");
        }
    }

    Ok(())
}
