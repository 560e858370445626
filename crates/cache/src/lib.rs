//! LRU disk cache
//!
//! This crate provides a key-addressed cache of byte blobs on disk with:
//! - SHA-256 derived, flat file layout (the filesystem is the index)
//! - Best-effort reads and writes that never fail the caller
//! - Size-bounded least-recently-used eviction
//! - Sweeps scheduled at most once per interval per cache root

pub mod config;
pub mod core;
pub mod errors;
pub mod state;

pub use config::{DiskCacheConfig, DiskCacheConfigBuilder, DiskCacheConfigLoader};
pub use core::{
    hash_key, plan_eviction, DiskCache, DiskCacheBuilder, EntryInfo, EvictionPlan, SweepOutcome,
    SweepReport, SweepStatus, SHARED_CACHE_NAME,
};
pub use errors::{CacheError, Error, RecoveryHint, Result};
pub use state::{FilePreferences, MemoryPreferences, PreferencesStore, PrefsError};
