//! Custom error types for Lumina
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Lumina operations
#[derive(Error, Debug)]
pub enum LuminaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Structured record store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Binary object store errors (open, read, write, delete)
    #[error("Blob store error: {0}")]
    BlobStore(String),

    /// Malformed or unsupported archive contents
    #[error("Archive format error: {0}")]
    Archive(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Failures reported by the analysis collaborator
    #[error("Analysis error: {0}")]
    Analysis(String),
}

impl LuminaError {
    /// Create a "not found" error for journal entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for media attachments
    pub fn media_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Media",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for to-do items
    pub fn todo_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Todo",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LuminaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LuminaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Lumina operations
pub type LuminaResult<T> = Result<T, LuminaError>;
