//! Cache eviction logic

mod plan;

pub use plan::{plan_eviction, EvictionPlan};

use diskcache_utils::is_temp_file_name;
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::paths::trash_prefix;
use crate::config::DiskCacheConfig;

/// Temporary files from interrupted writes older than this are deleted
const STALE_TEMP_AGE: Duration = Duration::from_secs(60 * 60);

/// A stored entry as seen by the sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: PathBuf,
    /// File length in bytes
    pub size: u64,
    /// Bytes allocated on disk
    pub allocated_size: u64,
    /// Later of access and modification time, `None` if neither is known
    pub last_used: Option<SystemTime>,
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries found under the root
    pub scanned: usize,
    /// Size of all entries before the sweep
    pub total_bytes: u64,
    pub evicted: usize,
    pub evicted_bytes: u64,
    pub remaining_bytes: u64,
    /// Leftover temporary files removed
    pub stale_temp_removed: usize,
    /// Old roots left next to the root by an interrupted `remove_all`
    pub trash_removed: usize,
}

pub(crate) struct Scan {
    pub entries: Vec<EntryInfo>,
    pub stale_temp_files: Vec<PathBuf>,
}

/// Hidden files are never cache entries
pub(crate) fn is_entry_name(name: &OsStr) -> bool {
    !name.to_string_lossy().starts_with('.')
}

/// List the entries under `root` with their size and recency.
///
/// Only a failure to list `root` itself is an error. Entries whose
/// metadata cannot be read are left out.
pub(crate) fn scan_entries(root: &Path) -> io::Result<Scan> {
    let mut entries = Vec::new();
    let mut stale_temp_files = Vec::new();

    for dir_entry in fs::read_dir(root)? {
        let dir_entry = match dir_entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", root.display(), e);
                continue;
            }
        };
        let path = dir_entry.path();
        let metadata = match dir_entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("Skipping {} during sweep: {}", path.display(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let name = dir_entry.file_name();
        if !is_entry_name(&name) {
            if is_temp_file_name(&name.to_string_lossy()) && is_stale(&metadata) {
                stale_temp_files.push(path);
            }
            continue;
        }

        entries.push(EntryInfo {
            path,
            size: metadata.len(),
            allocated_size: allocated_size(&metadata),
            last_used: last_used(&metadata),
        });
    }

    Ok(Scan {
        entries,
        stale_temp_files,
    })
}

/// Trash directories next to `root` that `remove_all` failed to delete.
///
/// Recently modified ones may still be in the middle of being deleted and
/// are left alone.
pub(crate) fn stale_trash_dirs(root: &Path) -> Vec<PathBuf> {
    let (Some(parent), Some(prefix)) = (root.parent(), trash_prefix(root)) else {
        return Vec::new();
    };
    let read_dir = match fs::read_dir(parent) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            tracing::debug!("Not checking {} for trash: {}", parent.display(), e);
            return Vec::new();
        }
    };

    read_dir
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
        .filter(|entry| {
            entry
                .metadata()
                .is_ok_and(|metadata| metadata.is_dir() && is_stale(&metadata))
        })
        .map(|entry| entry.path())
        .collect()
}

/// Trim `root` down to the configured target size, least recently used
/// entries first.
pub(crate) fn evict(root: &Path, config: &DiskCacheConfig) -> io::Result<SweepReport> {
    let scan = scan_entries(root)?;

    let mut stale_temp_removed = 0;
    for path in &scan.stale_temp_files {
        if remove_quietly(path) {
            stale_temp_removed += 1;
        }
    }

    let mut trash_removed = 0;
    for dir in stale_trash_dirs(root) {
        match fs::remove_dir_all(&dir) {
            Ok(()) => trash_removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to delete old cache tree {}: {}", dir.display(), e),
        }
    }

    let plan = plan_eviction(scan.entries, config.size_limit, config.target_size());

    let mut evicted = 0;
    let mut evicted_bytes = 0;
    for entry in &plan.evict {
        if remove_quietly(&entry.path) {
            evicted += 1;
            evicted_bytes += entry.size;
        }
    }

    Ok(SweepReport {
        scanned: plan.scanned,
        total_bytes: plan.total_bytes,
        evicted,
        evicted_bytes,
        remaining_bytes: plan.total_bytes.saturating_sub(evicted_bytes),
        stale_temp_removed,
        trash_removed,
    })
}

/// Delete a file, logging failures. An already missing file counts as
/// removed.
fn remove_quietly(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => {
            tracing::warn!("Failed to evict {}: {}", path.display(), e);
            false
        }
    }
}

fn last_used(metadata: &Metadata) -> Option<SystemTime> {
    match (metadata.accessed().ok(), metadata.modified().ok()) {
        (Some(accessed), Some(modified)) => Some(accessed.max(modified)),
        (accessed, modified) => accessed.or(modified),
    }
}

fn is_stale(metadata: &Metadata) -> bool {
    metadata
        .modified()
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age >= STALE_TEMP_AGE)
}

#[cfg(unix)]
fn allocated_size(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.blocks() * 512
}

#[cfg(not(unix))]
fn allocated_size(metadata: &Metadata) -> u64 {
    metadata.len()
}
