//! Core cache types and structures

use crate::config::DiskCacheConfig;
use diskcache_utils::PreferencesStore;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::AtomicU8;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::sweep::SweepOutcome;

/// LRU disk cache storing byte blobs as files under one root directory.
///
/// Cloning is cheap and clones share the same instance.
///
/// Reads, writes and removals are synchronous and never fail from the
/// caller's point of view: an unreadable entry is a miss and a failed write
/// is dropped. Only [`DiskCache::remove_all`] and [`DiskCache::sweep`]
/// report errors.
///
/// Two instances managing the same root at the same time is not supported.
/// Nothing prevents it, but sweeps of both instances may race.
#[derive(Clone)]
pub struct DiskCache {
    pub(super) inner: Arc<DiskCacheInner>,
}

pub(super) struct DiskCacheInner {
    /// Absolute path of the directory managed by the cache
    pub root: PathBuf,
    pub config: DiskCacheConfig,
    /// Where the time of the last successful sweep is persisted
    pub preferences: Arc<dyn PreferencesStore>,
    /// Preferences key for this root's sweep timestamp
    pub sweep_key: String,
    /// Current [`SweepStatus`](super::sweep::SweepStatus)
    pub status: AtomicU8,
    /// Deferred sweep scheduled at construction
    pub sweep_handle: Mutex<Option<JoinHandle<SweepOutcome>>>,
}

impl Drop for DiskCacheInner {
    fn drop(&mut self) {
        if let Some(handle) = self.sweep_handle.get_mut().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for DiskCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskCache")
            .field("root", &self.inner.root)
            .field("size_limit", &self.inner.config.size_limit)
            .field("sweep_status", &self.sweep_status())
            .finish()
    }
}

impl DiskCache {
    /// The directory managed by the cache
    pub fn root(&self) -> &std::path::Path {
        &self.inner.root
    }

    pub fn config(&self) -> &DiskCacheConfig {
        &self.inner.config
    }
}
