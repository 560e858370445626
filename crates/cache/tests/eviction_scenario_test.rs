//! End-to-end eviction scenario over the public API

use diskcache::{DiskCache, DiskCacheConfig, MemoryPreferences};
use std::collections::HashSet;
use std::fs::{self, FileTimes};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const KEYS: [&str; 5] = ["key1", "key2", "key3", "key4", "key5"];

fn cache_with_limit(root: &std::path::Path, size_limit: u64) -> DiskCache {
    DiskCache::builder(root)
        .config(DiskCacheConfig {
            size_limit,
            ..DiskCacheConfig::default()
        })
        .preferences(Arc::new(MemoryPreferences::new()))
        .auto_sweep(false)
        .build()
        .expect("valid configuration")
}

fn age_entry(cache: &DiskCache, key: &str, age: Duration) {
    let path = cache.file_path(key).unwrap();
    let when = SystemTime::now() - age;
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_times(FileTimes::new().set_accessed(when).set_modified(when))
        .unwrap();
}

#[test]
fn test_recently_read_entries_survive_sweep() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_with_limit(temp_dir.path(), 1000);

    for key in KEYS {
        cache.set(key, &[7u8; 300]);
        age_entry(&cache, key, Duration::from_secs(3600));
    }
    assert_eq!(cache.total_size(), 1500);

    // Reading refreshes recency
    assert!(cache.get("key1").is_some());
    assert!(cache.get("key2").is_some());

    let report = cache.sweep().unwrap();
    assert_eq!(report.total_bytes, 1500);
    assert!(report.remaining_bytes <= 500);

    let survivors: HashSet<&str> = KEYS.iter().copied().filter(|k| cache.contains(k)).collect();
    let evicted: HashSet<&str> = KEYS.iter().copied().filter(|k| !cache.contains(k)).collect();

    // Trimming to half the limit leaves room for a single 300 byte entry,
    // and it must be one of the two that were just read.
    assert!(cache.total_size() <= 500);
    assert_eq!(survivors.len(), 1);
    assert!(survivors.is_subset(&HashSet::from(["key1", "key2"])));
    assert!(HashSet::from(["key3", "key4", "key5"]).is_subset(&evicted));

    // Survivors are intact and readable
    for key in survivors {
        assert_eq!(cache.get(key), Some(vec![7u8; 300]));
    }
}

#[test]
fn test_higher_trim_ratio_keeps_recent_entries() {
    let temp_dir = TempDir::new().unwrap();
    let cache = DiskCache::builder(temp_dir.path())
        .config(DiskCacheConfig {
            size_limit: 1000,
            trim_ratio: 0.7,
            ..DiskCacheConfig::default()
        })
        .preferences(Arc::new(MemoryPreferences::new()))
        .auto_sweep(false)
        .build()
        .unwrap();

    for (i, key) in KEYS.iter().enumerate() {
        cache.set(key, &[1u8; 300]);
        // key1 oldest ... key5 newest
        age_entry(&cache, key, Duration::from_secs(600 - i as u64 * 100));
    }
    assert!(cache.get("key1").is_some());
    assert!(cache.get("key2").is_some());

    cache.sweep().unwrap();

    // Target 700: two 300 byte entries fit
    assert_eq!(cache.count(), 2);
    assert!(cache.contains("key1"));
    assert!(cache.contains("key2"));
}

#[test]
fn test_sweep_under_limit_keeps_everything() {
    let temp_dir = TempDir::new().unwrap();
    let cache = cache_with_limit(temp_dir.path(), 1000);

    for key in &KEYS[..3] {
        cache.set(key, &[0u8; 300]);
    }
    let report = cache.sweep().unwrap();

    assert_eq!(report.evicted, 0);
    assert_eq!(cache.count(), 3);
    assert_eq!(cache.total_size(), 900);
}
