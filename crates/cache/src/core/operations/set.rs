//! Cache write operations

use diskcache_utils::write_atomic;
use std::fs;
use std::io::ErrorKind;

use crate::core::types::DiskCache;

/// The root is recreated at most this many times per write
const MAX_WRITE_RETRIES: u32 = 1;

impl DiskCache {
    /// Store `data` under `key`, replacing any existing entry.
    ///
    /// Writes are best-effort. If the root directory has been deleted from
    /// under the cache it is recreated and the write retried once; any other
    /// failure drops the write.
    pub fn set(&self, key: &str, data: &[u8]) {
        let Some(path) = self.entry_path(key, "write") else {
            return;
        };

        let mut retries = 0;
        loop {
            match write_atomic(&path, data) {
                Ok(()) => return,
                Err(e) if e.kind() == ErrorKind::NotFound && retries < MAX_WRITE_RETRIES => {
                    retries += 1;
                    tracing::debug!(
                        "Cache root {} is missing, recreating it",
                        self.inner.root.display()
                    );
                    if let Err(e) = fs::create_dir_all(&self.inner.root) {
                        tracing::warn!(
                            "Dropping cache write to {}: failed to recreate root: {}",
                            path.display(),
                            e
                        );
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!("Dropping cache write to {}: {}", path.display(), e);
                    return;
                }
            }
        }
    }
}
