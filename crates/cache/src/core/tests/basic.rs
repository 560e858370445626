//! Basic cache operation tests

use super::{backdate, manual_cache};
use crate::config::DiskCacheConfig;
use crate::core::{DiskCache, SHARED_CACHE_NAME};
use crate::errors::CacheError;
use serial_test::serial;
use std::env;
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[test]
fn test_basic_operations() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    assert_eq!(cache.get("key1"), None);
    assert!(!cache.contains("key1"));

    cache.set("key1", b"value1");
    assert_eq!(cache.get("key1"), Some(b"value1".to_vec()));
    assert!(cache.contains("key1"));
    assert!(!cache.contains("key2"));

    cache.remove("key1");
    assert_eq!(cache.get("key1"), None);
    assert!(!cache.contains("key1"));

    // Removing again is a no-op
    cache.remove("key1");
}

#[test]
fn test_roundtrip_empty_and_large_values() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    cache.set("empty", b"");
    assert_eq!(cache.get("empty"), Some(Vec::new()));

    let large: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    cache.set("large", &large);
    assert_eq!(cache.get("large"), Some(large));
}

#[test]
fn test_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    cache.set("key", b"first");
    cache.set("key", b"second, longer value");
    assert_eq!(cache.get("key"), Some(b"second, longer value".to_vec()));
    assert_eq!(cache.count(), 1);
}

#[test]
fn test_entries_are_flat_hashed_files() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    cache.set("https://example.com/a.png", b"png");
    let path = cache.file_path("https://example.com/a.png").unwrap();
    assert_eq!(path.parent().unwrap(), cache.root());
    assert_eq!(path.file_name().unwrap().len(), 64);
    assert_eq!(fs::read(&path).unwrap(), b"png");
}

#[test]
fn test_empty_key_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    assert_eq!(cache.file_path(""), None);
    cache.set("", b"nope");
    assert_eq!(cache.get(""), None);
    assert!(!cache.contains(""));
    cache.remove("");
    assert_eq!(cache.count(), 0);

    // Still functional afterwards
    cache.set("valid", b"yes");
    assert_eq!(cache.get("valid"), Some(b"yes".to_vec()));
}

#[test]
fn test_count_and_sizes() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    cache.set("a", &[1u8; 100]);
    cache.set("b", &[2u8; 250]);
    // Hidden files and directories are not entries
    fs::write(cache.root().join(".DS_Store"), b"junk").unwrap();
    fs::create_dir(cache.root().join("nested")).unwrap();

    assert_eq!(cache.count(), 2);
    assert_eq!(cache.total_size(), 350);

    cache.remove_all().unwrap();
    assert_eq!(cache.total_size(), 0);
    assert_eq!(cache.total_allocated_size(), 0);
}

#[test]
fn test_set_recreates_deleted_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("cache");
    let cache = manual_cache(&root, DiskCacheConfig::default());

    cache.set("a", b"1");
    fs::remove_dir_all(&root).unwrap();
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.count(), 0);

    cache.set("b", b"2");
    assert!(root.is_dir());
    assert_eq!(cache.get("b"), Some(b"2".to_vec()));
}

#[test]
fn test_unwritable_entry_is_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    // A non-empty directory where the entry should go makes the write fail
    let path = cache.file_path("blocked").unwrap();
    fs::create_dir(&path).unwrap();
    fs::write(path.join("child"), b"x").unwrap();

    cache.set("blocked", b"value");
    assert_eq!(cache.get("blocked"), None);
    // No temp files left behind
    let leftovers = fs::read_dir(cache.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with('.'))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_unreadable_entry_is_a_miss() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    let path = cache.file_path("dir").unwrap();
    fs::create_dir(&path).unwrap();
    assert_eq!(cache.get("dir"), None);
    assert!(!cache.contains("dir"));
}

#[test]
fn test_get_marks_entry_recently_used() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    cache.set("key", b"value");
    let path = cache.file_path("key").unwrap();
    backdate(&path, Duration::from_secs(3600));

    let before = SystemTime::now() - Duration::from_secs(60);
    assert!(cache.get("key").is_some());

    let accessed = fs::metadata(&path).unwrap().accessed().unwrap();
    assert!(accessed >= before);
}

#[test]
fn test_remove_all() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("cache");
    let cache = manual_cache(&root, DiskCacheConfig::default());

    for i in 0..10 {
        cache.set(&format!("key{i}"), b"data");
    }
    assert_eq!(cache.count(), 10);

    cache.remove_all().unwrap();

    assert!(root.is_dir());
    assert_eq!(cache.count(), 0);
    for i in 0..10 {
        assert_eq!(cache.get(&format!("key{i}")), None);
    }
    // The renamed-away tree is gone too
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);

    // Still usable afterwards
    cache.set("again", b"yes");
    assert_eq!(cache.get("again"), Some(b"yes".to_vec()));
}

#[test]
fn test_remove_all_with_missing_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("cache");
    let cache = manual_cache(&root, DiskCacheConfig::default());

    fs::remove_dir_all(&root).unwrap();
    cache.remove_all().unwrap();
    assert!(root.is_dir());
    assert_eq!(cache.count(), 0);
}

#[test]
fn test_remove_all_failure_is_returned() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("file");
    fs::write(&blocker, b"not a directory").unwrap();

    // The root can never exist below a regular file
    let root = blocker.join("cache");
    let cache = manual_cache(&root, DiskCacheConfig::default());

    match cache.remove_all() {
        Err(CacheError::Io { path, .. }) => assert_eq!(path, root),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(blocker.is_file());
}

#[cfg(unix)]
#[test]
fn test_allocated_size_covers_entries() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());

    // Incompressible payloads so compressing filesystems allocate in full
    let mut state: u32 = 0x2545_f491;
    for key in ["a", "b", "c"] {
        let payload: Vec<u8> = (0..10_000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect();
        cache.set(key, &payload);
    }

    assert_eq!(cache.total_size(), 30_000);
    assert!(cache.total_allocated_size() >= cache.total_size());
}

#[test]
#[serial]
fn test_named_and_shared_instances() {
    let temp_dir = TempDir::new().unwrap();
    let cache_home = temp_dir.path().join("cache-home");
    let saved: Vec<(&str, Option<String>)> = ["XDG_CACHE_HOME", "XDG_STATE_HOME"]
        .into_iter()
        .map(|var| (var, env::var(var).ok()))
        .collect();
    env::set_var("XDG_CACHE_HOME", &cache_home);
    env::set_var("XDG_STATE_HOME", temp_dir.path().join("state-home"));

    let named = DiskCache::named("x", DiskCacheConfig::default()).unwrap();
    let named_root = named.root().to_path_buf();
    let first = DiskCache::shared();
    let second = DiskCache::shared();

    for (var, value) in saved {
        match value {
            Some(value) => env::set_var(var, value),
            None => env::remove_var(var),
        }
    }

    assert_eq!(named_root, cache_home.join("diskcache").join("x"));
    assert!(named_root.is_dir());

    assert!(std::ptr::eq(first, second));
    assert_eq!(
        first.root().file_name().unwrap().to_str(),
        Some(SHARED_CACHE_NAME)
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config = DiskCacheConfig {
        trim_ratio: 0.0,
        ..DiskCacheConfig::default()
    };
    let result = DiskCache::builder(temp_dir.path())
        .config(config)
        .auto_sweep(false)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_clones_share_the_same_cache() {
    let temp_dir = TempDir::new().unwrap();
    let cache = manual_cache(temp_dir.path(), DiskCacheConfig::default());
    let clone = cache.clone();

    cache.set("shared", b"v");
    assert_eq!(clone.get("shared"), Some(b"v".to_vec()));
    assert_eq!(clone.root(), cache.root());
}
