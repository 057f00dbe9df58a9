//! # Slice Store
//!
//! File-backed key-value persistence for the nine state slices.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SliceStore                                      │
//! │                                                                         │
//! │  Session startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SliceStore::open(data_dir) ← creates the directory if missing          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load(key)  ──► read <dir>/<key>.json ──► Some(T) | None (absent)       │
//! │  save(key)  ──► write <dir>/<key>.json.tmp, then rename                 │
//! │  remove(key)──► delete <dir>/<key>.json (absent is fine)                │
//! │                                                                         │
//! │  The tmp-then-rename dance keeps a crash mid-write from leaving a       │
//! │  half-written slice: the old file survives until the rename lands.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::slices::SliceKey;

/// File-per-slice JSON store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct SliceStore {
    root: PathBuf,
}

impl SliceStore {
    /// Opens (and creates, if needed) a store at the given directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        debug!(dir = %root.display(), "Slice store opened");
        Ok(SliceStore { root })
    }

    /// The directory this store lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of one slice's file.
    pub fn slice_path(&self, key: SliceKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }

    /// Loads a slice. `None` when the slice has never been written.
    ///
    /// A file that exists but does not parse surfaces as
    /// [`StoreError::Corrupt`] - the caller decides the recovery policy
    /// (the session falls back to the seed default).
    pub fn load<T: DeserializeOwned>(&self, key: SliceKey) -> StoreResult<Option<T>> {
        let path = self.slice_path(key);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let value = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: key.as_str(),
            source,
        })?;
        Ok(Some(value))
    }

    /// Saves a slice atomically (temp file, then rename).
    pub fn save<T: Serialize>(&self, key: SliceKey, value: &T) -> StoreResult<()> {
        let path = self.slice_path(key);
        let tmp = path.with_extension("json.tmp");

        let raw = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
            key: key.as_str(),
            source,
        })?;

        fs::write(&tmp, &raw).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })?;

        debug!(slice = key.as_str(), bytes = raw.len(), "Slice written");
        Ok(())
    }

    /// Removes a slice file. Removing an absent slice is not an error.
    pub fn remove(&self, key: SliceKey) -> StoreResult<()> {
        let path = self.slice_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(slice = key.as_str(), "Slice removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
