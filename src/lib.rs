//! Lumina - local-first personal journal
//!
//! This library provides the core of the Lumina journal: entries with
//! optional mood analysis, media attachments kept in a separate blob store,
//! cached aggregate reports, draft recovery, writing streaks and portable
//! archives that carry the whole journal between machines.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Core data models (entries, media, reports, drafts)
//! - `storage`: JSON record slots and the binary blob store
//! - `archive`: Archive export, import and rolling backups
//! - `services`: Business logic layer
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use lumina::config::{paths::LuminaPaths, settings::Settings};
//! use lumina::services::JournalService;
//! use lumina::storage::Storage;
//!
//! let paths = LuminaPaths::new()?;
//! let storage = Storage::new(paths)?;
//! JournalService::new(&storage).create_entry("Slept well, long walk after lunch.")?;
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LuminaError, LuminaResult};
