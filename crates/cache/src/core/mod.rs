//! Disk cache implementation
//!
//! Entries are plain files named by the SHA-256 of their key, stored
//! directly under the cache root. The filesystem is the only index:
//! sizes and recency come from file metadata, and a periodic sweep trims
//! the root back under its size limit, least recently used first.

// Private modules
mod builder;
mod eviction;
mod operations;
mod paths;
mod sweep;
mod types;

pub use builder::{DiskCacheBuilder, SHARED_CACHE_NAME};
pub use eviction::{plan_eviction, EntryInfo, EvictionPlan, SweepReport};
pub use paths::{hash_key, sweep_state_key};
pub use sweep::{is_sweep_due, SweepOutcome, SweepStatus};
pub use types::DiskCache;

#[cfg(test)]
mod tests;
