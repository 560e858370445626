//! Process-wide key-value preferences
//!
//! A tiny persistent store for values that must survive restarts but do
//! not belong in any cache directory, such as the time of the last cache
//! sweep for each cache root.

use crate::atomic_file::write_atomic_create_dirs;
use crate::xdg::XdgPaths;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors raised while persisting preferences
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to write preferences file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value store for timestamps
pub trait PreferencesStore: Send + Sync {
    /// Read a timestamp, `None` when unset or unreadable
    fn get_date(&self, key: &str) -> Option<DateTime<Utc>>;

    /// Persist a timestamp
    fn set_date(&self, key: &str, value: DateTime<Utc>) -> Result<(), PrefsError>;
}

static GLOBAL_PREFERENCES: Lazy<Arc<FilePreferences>> =
    Lazy::new(|| Arc::new(FilePreferences::new(XdgPaths::preferences_file())));

/// Preferences persisted as a JSON object on disk
///
/// The file is re-read on every access so several stores pointed at the same
/// file observe each other's writes. Writes within one process are
/// serialized; writes from different processes are last-writer-wins.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The process-wide store under the XDG state directory
    pub fn global() -> Arc<FilePreferences> {
        Arc::clone(&GLOBAL_PREFERENCES)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Map<String, Value> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                tracing::warn!(
                    "Failed to read preferences {}: {}",
                    self.path.display(),
                    e
                );
                return Map::new();
            }
        };

        match serde_json::from_slice::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(
                    "Ignoring malformed preferences file {}",
                    self.path.display()
                );
                Map::new()
            }
        }
    }
}

impl PreferencesStore for FilePreferences {
    fn get_date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.load()
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    fn set_date(&self, key: &str, value: DateTime<Utc>) -> Result<(), PrefsError> {
        let _guard = self.write_lock.lock();
        let mut values = self.load();
        values.insert(key.to_string(), serde_json::to_value(value)?);

        let bytes = serde_json::to_vec_pretty(&Value::Object(values))?;
        write_atomic_create_dirs(&self.path, &bytes).map_err(|source| PrefsError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Preferences kept in memory only
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    dates: DashMap<String, DateTime<Utc>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn get_date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.dates.get(key).map(|v| *v)
    }

    fn set_date(&self, key: &str, value: DateTime<Utc>) -> Result<(), PrefsError> {
        self.dates.insert(key.to_string(), value);
        Ok(())
    }
}
