//! Binary object store
//!
//! Stores images, drawings, recordings and other payloads outside the JSON
//! record slots so large content is never re-serialised with them. The
//! on-disk engine keeps one file per blob, named by the hex encoding of the
//! blob reference.

use std::fs;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::error::{LuminaError, LuminaResult};
use crate::models::BlobRef;

use super::file_io::{remove_if_exists, write_bytes_atomic};

/// Key-to-bytes storage for binary payloads
///
/// A missing key is a normal outcome (`Ok(None)`), never an error.
pub trait BlobStore: Send + Sync {
    /// Insert or overwrite the content stored under `key`
    fn put(&self, key: &BlobRef, content: &[u8]) -> LuminaResult<()>;

    /// Fetch the content stored under `key`
    fn get(&self, key: &BlobRef) -> LuminaResult<Option<Vec<u8>>>;

    /// Size in bytes of the content stored under `key`, without reading it
    fn size(&self, key: &BlobRef) -> LuminaResult<Option<u64>>;

    /// Remove the content stored under `key`; removing a missing key succeeds
    fn delete(&self, key: &BlobRef) -> LuminaResult<()>;

    /// Every key currently stored
    fn keys(&self) -> LuminaResult<Vec<BlobRef>>;
}

/// Opened engine handle
#[derive(Debug)]
struct BlobDir {
    root: PathBuf,
}

impl BlobDir {
    fn open(root: &Path) -> LuminaResult<Self> {
        fs::create_dir_all(root).map_err(|e| {
            LuminaError::BlobStore(format!(
                "Failed to open blob store at {}: {}",
                root.display(),
                e
            ))
        })?;

        let metadata = fs::metadata(root).map_err(|e| {
            LuminaError::BlobStore(format!("Failed to inspect {}: {}", root.display(), e))
        })?;
        if !metadata.is_dir() {
            return Err(LuminaError::BlobStore(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        debug!(root = %root.display(), "opened blob store");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn blob_path(&self, key: &BlobRef) -> PathBuf {
        self.root.join(hex::encode(key.as_str()))
    }
}

/// Filesystem-backed blob store
///
/// The directory is opened on first use and the handle is shared by every
/// later call. Concurrent first callers wait on the same initialisation; a
/// failed open leaves the store unopened so the next call tries again.
pub struct FsBlobStore {
    root: PathBuf,
    handle: OnceCell<BlobDir>,
    #[cfg(test)]
    opens: AtomicUsize,
}

impl FsBlobStore {
    /// Create a store rooted at `root`; nothing touches the disk yet
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            handle: OnceCell::new(),
            #[cfg(test)]
            opens: AtomicUsize::new(0),
        }
    }

    /// Directory holding the blobs
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir(&self) -> LuminaResult<&BlobDir> {
        self.handle.get_or_try_init(|| {
            #[cfg(test)]
            self.opens.fetch_add(1, Ordering::SeqCst);
            BlobDir::open(&self.root)
        })
    }

    #[cfg(test)]
    fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &BlobRef, content: &[u8]) -> LuminaResult<()> {
        let dir = self.dir()?;
        write_bytes_atomic(&dir.blob_path(key), content).map_err(|e| {
            LuminaError::BlobStore(format!("Failed to write blob {}: {}", key, e))
        })?;
        trace!(blob = %key, bytes = content.len(), "stored blob");
        Ok(())
    }

    fn get(&self, key: &BlobRef) -> LuminaResult<Option<Vec<u8>>> {
        let dir = self.dir()?;
        match fs::read(dir.blob_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LuminaError::BlobStore(format!(
                "Failed to read blob {}: {}",
                key, e
            ))),
        }
    }

    fn size(&self, key: &BlobRef) -> LuminaResult<Option<u64>> {
        let dir = self.dir()?;
        match fs::metadata(dir.blob_path(key)) {
            Ok(metadata) => Ok(Some(metadata.len())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LuminaError::BlobStore(format!(
                "Failed to inspect blob {}: {}",
                key, e
            ))),
        }
    }

    fn delete(&self, key: &BlobRef) -> LuminaResult<()> {
        let dir = self.dir()?;
        remove_if_exists(&dir.blob_path(key)).map_err(|e| {
            LuminaError::BlobStore(format!("Failed to delete blob {}: {}", key, e))
        })
    }

    fn keys(&self) -> LuminaResult<Vec<BlobRef>> {
        let dir = self.dir()?;
        let read_dir = fs::read_dir(&dir.root).map_err(|e| {
            LuminaError::BlobStore(format!("Failed to list blob store: {}", e))
        })?;

        let mut keys = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| {
                LuminaError::BlobStore(format!("Failed to read blob store entry: {}", e))
            })?;
            let file_name = item.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            // Temp files and anything not written by this store are skipped
            match decode_key(name) {
                Some(key) => keys.push(key),
                None => debug!(file = name, "ignoring foreign file in blob store"),
            }
        }

        keys.sort();
        Ok(keys)
    }
}

fn decode_key(file_name: &str) -> Option<BlobRef> {
    let bytes = hex::decode(file_name).ok()?;
    let key = String::from_utf8(bytes).ok()?;
    BlobRef::parse(&key).ok()
}

/// Blob engine wrapper that fails reads or writes for chosen keys
#[cfg(test)]
pub(crate) mod faulty {
    use std::collections::HashSet;

    use super::*;

    pub(crate) struct FaultyBlobStore {
        inner: FsBlobStore,
        unreadable: HashSet<BlobRef>,
        unwritable: HashSet<BlobRef>,
    }

    impl FaultyBlobStore {
        pub(crate) fn new(root: PathBuf) -> Self {
            Self {
                inner: FsBlobStore::new(root),
                unreadable: HashSet::new(),
                unwritable: HashSet::new(),
            }
        }

        pub(crate) fn fail_reads(mut self, key: &str) -> Self {
            self.unreadable.insert(BlobRef::parse(key).unwrap());
            self
        }

        pub(crate) fn fail_writes(mut self, key: &str) -> Self {
            self.unwritable.insert(BlobRef::parse(key).unwrap());
            self
        }
    }

    impl BlobStore for FaultyBlobStore {
        fn put(&self, key: &BlobRef, content: &[u8]) -> LuminaResult<()> {
            if self.unwritable.contains(key) {
                return Err(LuminaError::BlobStore(format!("disk full writing {}", key)));
            }
            self.inner.put(key, content)
        }

        fn get(&self, key: &BlobRef) -> LuminaResult<Option<Vec<u8>>> {
            if self.unreadable.contains(key) {
                return Err(LuminaError::BlobStore(format!("bad sector reading {}", key)));
            }
            self.inner.get(key)
        }

        fn size(&self, key: &BlobRef) -> LuminaResult<Option<u64>> {
            self.inner.size(key)
        }

        fn delete(&self, key: &BlobRef) -> LuminaResult<()> {
            self.inner.delete(key)
        }

        fn keys(&self) -> LuminaResult<Vec<BlobRef>> {
            self.inner.keys()
        }
    }
}
