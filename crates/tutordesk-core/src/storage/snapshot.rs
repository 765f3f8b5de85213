//! Keyed JSON snapshot persistence.
//!
//! One file, `~/.config/tutordesk/snapshot.json`, maps versioned string
//! keys to raw JSON blobs, one per collection. Loading tolerates a missing
//! file (fresh install); every save rewrites the file whole. Collections
//! are a few kilobytes at most, so there is no incremental path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::data_dir;

pub const STUDENTS_KEY: &str = "students_v1";
pub const SESSIONS_KEY: &str = "sessions_v1";
pub const SCHOOL_SESSIONS_KEY: &str = "school_sessions_v1";
pub const LAST_AUTO_BACKUP_KEY: &str = "last_auto_backup_v1";

const SNAPSHOT_FILE: &str = "snapshot.json";

/// Keyed JSON blobs on disk.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl SnapshotStore {
    /// Open the snapshot in the application data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved or the
    /// file exists but is not a JSON string map.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::open_at(data_dir()?.join(SNAPSHOT_FILE))?)
    }

    /// Open a snapshot at an explicit path. Tests point this at a tempdir.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed. A missing
    /// file is not an error; it yields an empty map.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let map = match std::fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StoreError::ParseFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StoreError::ReadFailed {
                    path,
                    source: e,
                })
            }
        };
        Ok(Self { path, map })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Stage a value in memory; nothing touches disk until [`save`](Self::save).
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    /// Write the whole map back to disk.
    ///
    /// # Errors
    /// Returns an error if encoding or the write fails.
    pub fn save(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.map)
            .map_err(|e| StoreError::EncodeFailed(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| StoreError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })
    }
}
