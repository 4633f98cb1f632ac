//! Report CLI commands
//!
//! Shows the cached aggregate reports, regenerating them on request, and the
//! current writing streak.

use clap::Subcommand;

use crate::config::{DayBoundary, Settings};
use crate::display::{format_guidance, format_journey, format_patterns, format_streak};
use crate::error::{LuminaError, LuminaResult};
use crate::services::{current_streak, AnalysisService, LexiconAnalyzer};
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Mood patterns across recent entries
    Patterns {
        /// Regenerate instead of showing the cached report
        #[arg(short, long)]
        refresh: bool,
    },
    /// Long-range journey narrative
    Journey {
        /// Regenerate instead of showing the cached report
        #[arg(short, long)]
        refresh: bool,
    },
    /// Guidance for today
    Guidance {
        /// Regenerate instead of showing the cached guidance
        #[arg(short, long)]
        refresh: bool,
    },
}

/// Handle a report command
///
/// A report that has never been generated is generated on first view.
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> LuminaResult<()> {
    let analyzer = LexiconAnalyzer::new();
    let service = AnalysisService::new(storage, &analyzer, settings.analysis_window);

    match cmd {
        ReportCommands::Patterns { refresh } => {
            let analysis = match service.patterns()? {
                Some(cached) if !refresh => cached,
                _ => service.refresh_patterns()?,
            };
            print!("{}", format_patterns(&analysis));
        }

        ReportCommands::Journey { refresh } => {
            let journey = match service.journey()? {
                Some(cached) if !refresh => cached,
                _ => service.refresh_journey()?,
            };
            print!("{}", format_journey(&journey));
        }

        ReportCommands::Guidance { refresh } => {
            let guidance = match service.guidance()? {
                Some(cached) if !refresh => cached,
                _ => service.refresh_guidance()?,
            };
            print!("{}", format_guidance(&guidance));
        }
    }

    Ok(())
}

/// Handle the streak command
pub fn handle_streak_command(
    storage: &Storage,
    settings: &Settings,
    boundary: Option<String>,
) -> LuminaResult<()> {
    let boundary = match boundary {
        Some(b) => DayBoundary::parse(&b).ok_or_else(|| {
            LuminaError::Validation(format!(
                "Invalid day boundary: '{}'. Valid values: elapsed, calendar",
                b
            ))
        })?,
        None => settings.streak_day_boundary,
    };

    let entries = storage.entries.get_all()?;
    println!("{}", format_streak(current_streak(&entries, boundary)));
    Ok(())
}
