//! File I/O utilities with atomic writes
//!
//! Every record slot is a single JSON document that is read whole and
//! rewritten whole. Writes go through a temp file and a rename so a crash
//! never leaves a half-written slot.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::LuminaError;

/// Read JSON from a file, degrading to the default value when the document
/// is missing or cannot be parsed
///
/// Open failures other than "not found" are still reported: an unreadable
/// slot is an engine failure, a garbled one is not.
pub fn read_json_lenient<T, P>(path: P) -> Result<T, LuminaError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(LuminaError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    match serde_json::from_slice(&contents) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt record slot, treating as empty");
            Ok(T::default())
        }
    }
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LuminaError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let mut buf = Vec::new();
    serde_json::to_writer_pretty(&mut buf, data)
        .map_err(|e| LuminaError::Storage(format!("Failed to serialize data: {}", e)))?;

    write_bytes_atomic(path, &buf).map_err(|e| match e {
        LuminaError::Io(msg) => LuminaError::Storage(msg),
        other => other,
    })
}

/// Write raw bytes to a file atomically (write to temp, then rename)
///
/// Each call writes through its own uniquely named temp file, so concurrent
/// writers to the same path each land a complete file and the last rename
/// wins. Errors are reported as `LuminaError::Io`; callers map them onto the
/// engine-specific variant.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), LuminaError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Ensure parent directory exists
    fs::create_dir_all(parent).map_err(|e| {
        LuminaError::Io(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    // Temp file in the same directory so the rename stays on one filesystem
    let temp = NamedTempFile::new_in(parent)
        .map_err(|e| LuminaError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(temp);
    writer
        .write_all(data)
        .map_err(|e| LuminaError::Io(format!("Failed to write data: {}", e)))?;

    let temp = writer
        .into_inner()
        .map_err(|e| LuminaError::Io(format!("Failed to flush data: {}", e.error())))?;

    // Sync to disk before rename
    temp.as_file()
        .sync_all()
        .map_err(|e| LuminaError::Io(format!("Failed to sync data: {}", e)))?;

    // A failed persist drops the temp file, which removes it
    temp.persist(path)
        .map_err(|e| LuminaError::Io(format!("Failed to rename temp file: {}", e.error)))?;

    Ok(())
}

/// Remove a file, treating "already absent" as success
pub fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        assert!(path.exists());

        let loaded: TestData = read_json_lenient(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        write_json_atomic(&path, &TestData::default()).unwrap();
        write_json_atomic(&path, &TestData::default()).unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|item| item.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("test.json")]);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &TestData::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_lenient_read_degrades_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.json");
        fs::write(&path, "{\"name\": \"trunc").unwrap();

        let data: Vec<TestData> = read_json_lenient(&path).unwrap();
        assert!(data.is_empty());

        let missing: Vec<TestData> = read_json_lenient(temp_dir.path().join("none.json")).unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_write_bytes_atomic_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob");

        write_bytes_atomic(&path, b"first").unwrap();
        write_bytes_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_concurrent_writers_to_one_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared");
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 64 * 1024]).collect();

        std::thread::scope(|s| {
            for payload in &payloads {
                let path = &path;
                s.spawn(move || {
                    for _ in 0..10 {
                        write_bytes_atomic(path, payload).unwrap();
                    }
                });
            }
        });

        let written = fs::read(&path).unwrap();
        assert!(payloads.contains(&written));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_remove_if_exists_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone");

        fs::write(&path, b"x").unwrap();
        remove_if_exists(&path).unwrap();
        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
