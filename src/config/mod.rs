//! Configuration module for Lumina
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LuminaPaths;
pub use settings::{BackupRetention, DayBoundary, Settings};
