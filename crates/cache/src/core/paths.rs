//! Key hashing and path generation

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use super::types::DiskCache;

/// Hash a cache key into a filesystem-safe file name.
///
/// Returns the lower-case hex SHA-256 of the key's UTF-8 bytes, or `None`
/// for the empty key, which callers must never use.
pub fn hash_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    Some(hex::encode(Sha256::digest(key.as_bytes())))
}

/// Preferences key under which the last sweep time of `root` is stored
pub fn sweep_state_key(root: &Path) -> String {
    format!("diskcache.last_sweep:{}", root.display())
}

/// Name prefix of the hidden siblings `remove_all` moves old contents to
pub(super) fn trash_prefix(root: &Path) -> Option<String> {
    root.file_name()
        .map(|name| format!(".{}.trash-", name.to_string_lossy()))
}

impl DiskCache {
    /// Path of the file backing `key`, `None` for the empty key
    pub fn file_path(&self, key: &str) -> Option<PathBuf> {
        hash_key(key).map(|name| self.inner.root.join(name))
    }

    /// Like [`file_path`](Self::file_path) but logs misuse of the empty key
    pub(super) fn entry_path(&self, key: &str, operation: &str) -> Option<PathBuf> {
        let path = self.file_path(key);
        if path.is_none() {
            tracing::warn!("Ignoring cache {} with an empty key", operation);
        }
        path
    }
}
