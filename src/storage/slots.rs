//! Single-document slots
//!
//! A slot holds at most one value and every write replaces it. Cached
//! reports and the editor draft each live in their own slot.

use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LuminaError;

use super::file_io::{read_json_lenient, remove_if_exists, write_json_atomic};

/// Repository for one overwritten value of type `T`
pub struct SlotRepository<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SlotRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a slot backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read the slot; absent or unparsable contents read as `None`
    pub fn get(&self) -> Result<Option<T>, LuminaError> {
        read_json_lenient::<Option<T>, _>(&self.path)
    }

    /// Overwrite the slot
    pub fn set(&self, value: &T) -> Result<(), LuminaError> {
        write_json_atomic(&self.path, value)
    }

    /// Empty the slot; clearing an empty slot is not an error
    pub fn clear(&self) -> Result<(), LuminaError> {
        remove_if_exists(&self.path).map_err(|e| {
            LuminaError::Storage(format!("Failed to clear {}: {}", self.path.display(), e))
        })
    }
}
