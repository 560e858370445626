//! Cache inspection

use crate::core::eviction::{is_entry_name, scan_entries};
use crate::core::types::DiskCache;
use std::fs;

impl DiskCache {
    /// Number of entries currently stored.
    ///
    /// Enumerates the root on every call; avoid calling it on a latency
    /// sensitive thread.
    pub fn count(&self) -> usize {
        let read_dir = match fs::read_dir(&self.inner.root) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                tracing::debug!("Failed to list {}: {}", self.inner.root.display(), e);
                return 0;
            }
        };

        read_dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter(|entry| is_entry_name(&entry.file_name()))
            .count()
    }

    /// Total length in bytes of all entries
    pub fn total_size(&self) -> u64 {
        scan_entries(&self.inner.root)
            .map(|scan| scan.entries.iter().map(|e| e.size).sum())
            .unwrap_or(0)
    }

    /// Total bytes allocated on disk for all entries, which may be larger
    /// than [`total_size`](Self::total_size)
    pub fn total_allocated_size(&self) -> u64 {
        scan_entries(&self.inner.root)
            .map(|scan| scan.entries.iter().map(|e| e.allocated_size).sum())
            .unwrap_or(0)
    }
}
