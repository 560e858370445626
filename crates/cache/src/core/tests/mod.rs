mod basic;

use crate::config::DiskCacheConfig;
use crate::core::DiskCache;
use diskcache_utils::MemoryPreferences;
use std::fs::{self, FileTimes};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Cache on `root` with in-memory sweep state and no automatic sweep
fn manual_cache(root: &Path, config: DiskCacheConfig) -> DiskCache {
    DiskCache::builder(root)
        .config(config)
        .preferences(Arc::new(MemoryPreferences::new()))
        .auto_sweep(false)
        .build()
        .unwrap()
}

/// Pretend the entry was last touched `age` ago
fn backdate(path: &Path, age: Duration) {
    let when = SystemTime::now() - age;
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_accessed(when).set_modified(when))
        .unwrap();
}
