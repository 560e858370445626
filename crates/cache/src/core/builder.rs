//! Cache builder and initialization

use crate::config::{named_cache_root, DiskCacheConfig, DiskCacheConfigLoader};
use crate::errors::Result;
use diskcache_utils::{background_handle, FilePreferences, PreferencesStore};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU8;
use std::sync::Arc;
use tokio::runtime::Handle;

use super::paths::sweep_state_key;
use super::sweep::{schedule_sweep_if_due, SweepStatus};
use super::types::{DiskCache, DiskCacheInner};

/// Name of the cache behind [`DiskCache::shared`]
pub const SHARED_CACHE_NAME: &str = "shared";

static SHARED: Lazy<DiskCache> = Lazy::new(|| {
    let config = DiskCacheConfigLoader::load().unwrap_or_else(|e| {
        tracing::warn!("Using default disk cache configuration: {}", e);
        DiskCacheConfig::default()
    });
    DiskCache::builder(named_cache_root(SHARED_CACHE_NAME))
        .config(config)
        .build_unchecked()
});

/// Builder for [`DiskCache`]
pub struct DiskCacheBuilder {
    root: PathBuf,
    config: DiskCacheConfig,
    preferences: Option<Arc<dyn PreferencesStore>>,
    runtime: Option<Handle>,
    auto_sweep: bool,
}

impl DiskCacheBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: DiskCacheConfig::default(),
            preferences: None,
            runtime: None,
            auto_sweep: true,
        }
    }

    pub fn config(mut self, config: DiskCacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Store used to persist the last sweep time, the process-wide
    /// [`FilePreferences`] by default
    pub fn preferences(mut self, preferences: Arc<dyn PreferencesStore>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Runtime the deferred sweep is spawned on. Defaults to the ambient
    /// runtime, or the shared background runtime outside of one.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Whether to check at construction if a sweep is due and schedule it
    pub fn auto_sweep(mut self, enabled: bool) -> Self {
        self.auto_sweep = enabled;
        self
    }

    /// Validate the configuration and create the cache
    pub fn build(self) -> Result<DiskCache> {
        self.config.validate()?;
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> DiskCache {
        let root = absolute(&self.root);

        if let Err(e) = std::fs::create_dir_all(&root) {
            // Not fatal: writes recreate the root on demand
            tracing::error!(
                "Failed to create cache root directory {}: {}",
                root.display(),
                e
            );
        }

        let preferences = self
            .preferences
            .unwrap_or_else(|| FilePreferences::global() as Arc<dyn PreferencesStore>);

        let inner = Arc::new(DiskCacheInner {
            sweep_key: sweep_state_key(&root),
            root,
            config: self.config,
            preferences,
            status: AtomicU8::new(SweepStatus::Idle as u8),
            sweep_handle: Mutex::new(None),
        });
        let cache = DiskCache { inner };

        if self.auto_sweep {
            let handle = match self.runtime {
                Some(handle) => Some(handle),
                None => match background_handle() {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        tracing::warn!("No background runtime for cache sweeps: {}", e);
                        None
                    }
                },
            };
            if let Some(handle) = handle {
                schedule_sweep_if_due(&cache, &handle);
            }
        }

        cache
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

impl DiskCache {
    pub fn builder(root: impl Into<PathBuf>) -> DiskCacheBuilder {
        DiskCacheBuilder::new(root)
    }

    /// Create a cache managing `root`, persisting sweep times in the
    /// process-wide preferences file
    pub fn new(root: impl Into<PathBuf>, config: DiskCacheConfig) -> Result<Self> {
        Self::builder(root).config(config).build()
    }

    /// Create a cache in a directory called `name` under the user's cache
    /// directory
    pub fn named(name: &str, config: DiskCacheConfig) -> Result<Self> {
        Self::new(named_cache_root(name), config)
    }

    /// The default cache instance, created on first use
    pub fn shared() -> &'static DiskCache {
        &SHARED
    }
}
