//! Display formatting for terminal output
//!
//! Provides utilities for formatting entries, reports and archive metadata
//! for terminal display.

pub mod entry;
pub mod report;

pub use entry::{format_entry_details, format_entry_list};
pub use report::{
    format_archive_info, format_backup_list, format_guidance, format_journey, format_patterns,
    format_streak, format_sweep_report,
};
