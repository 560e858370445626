//! Cache read operations

use std::fs::{self, FileTimes};
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use crate::core::types::DiskCache;

impl DiskCache {
    /// Get the data stored for `key`.
    ///
    /// Returns `None` when the entry is absent or cannot be read. A hit
    /// marks the entry as recently used.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key, "read")?;

        match fs::read(&path) {
            Ok(data) => {
                mark_accessed(&path);
                Some(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!("Treating unreadable entry {} as a miss: {}", path.display(), e);
                None
            }
        }
    }

    /// Whether an entry exists for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.file_path(key).is_some_and(|path| path.is_file())
    }
}

/// Bump the access time of an entry.
///
/// Reads alone do not reliably update atime (`relatime`, `noatime`), and the
/// sweep orders entries by it.
fn mark_accessed(path: &Path) {
    let result = fs::File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_times(FileTimes::new().set_accessed(SystemTime::now())));
    if let Err(e) = result {
        tracing::trace!("Failed to bump access time of {}: {}", path.display(), e);
    }
}
