//! Cache remove operations

use std::fs;
use std::io::ErrorKind;

use crate::core::types::DiskCache;

impl DiskCache {
    /// Remove the entry for `key`. Removing an absent entry does nothing.
    pub fn remove(&self, key: &str) {
        let Some(path) = self.entry_path(key, "remove") else {
            return;
        };

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Failed to remove cache entry {}: {}", path.display(), e);
            }
        }
    }
}
