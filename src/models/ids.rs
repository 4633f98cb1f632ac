//! Strongly-typed ID wrappers for journal records
//!
//! Identifiers are opaque strings: freshly created records get a UUID, but
//! any non-empty identifier found in an imported document is kept verbatim.
//! Newtype wrappers prevent mixing up entry and media ids at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LuminaError;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Parse an ID from a string, rejecting blank input
            pub fn parse(s: &str) -> Result<Self, LuminaError> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(LuminaError::Validation(format!(
                        "{} id cannot be empty",
                        $entity
                    )));
                }
                Ok(Self(s.to_string()))
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Short form for terminal display
            pub fn short(&self) -> &str {
                self.0.get(..8).unwrap_or(&self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = LuminaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_id!(EntryId, "Entry");
define_id!(MediaId, "Media");
define_id!(TodoId, "Todo");
