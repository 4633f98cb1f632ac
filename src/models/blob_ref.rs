//! Blob references
//!
//! A `BlobRef` names a binary payload. The same string is the key in the
//! object store and the member name below `media/` inside an archive, so it
//! is validated to be usable as both.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LuminaError;

/// Longest accepted reference, in bytes
pub const MAX_BLOB_REF_LEN: usize = 120;

/// Opaque key of a binary payload in the object store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobRef(String);

impl BlobRef {
    /// Generate a fresh reference
    pub fn new() -> Self {
        Self(format!("blob-{}", Uuid::new_v4().simple()))
    }

    /// Parse and validate a reference
    pub fn parse(s: &str) -> Result<Self, LuminaError> {
        validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Get the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(s: &str) -> Result<(), LuminaError> {
    let invalid = |reason: &str| {
        Err(LuminaError::Validation(format!(
            "Invalid blob reference '{}': {}",
            s.escape_default(),
            reason
        )))
    };

    if s.is_empty() {
        return invalid("empty");
    }
    if s.len() > MAX_BLOB_REF_LEN {
        return invalid("too long");
    }
    if s == "." || s == ".." {
        return invalid("reserved name");
    }
    if s.contains('/') || s.contains('\\') {
        return invalid("contains a path separator");
    }
    if s.chars().any(char::is_control) {
        return invalid("contains control characters");
    }
    Ok(())
}

impl Default for BlobRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BlobRef {
    type Err = LuminaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BlobRef {
    type Error = LuminaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl From<BlobRef> for String {
    fn from(value: BlobRef) -> Self {
        value.0
    }
}
