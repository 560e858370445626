//! Sweep scheduling
//!
//! A sweep runs the eviction engine over the cache root. Whether one is
//! due is decided once, when the cache is created, from the time of the
//! last successful sweep of the same root. A due sweep starts after a short
//! delay on the background runtime so it does not compete with startup
//! work. The timestamp is only advanced when a sweep succeeds, so a failed
//! sweep is retried by the next instance.

mod background;

pub(super) use background::schedule_sweep_if_due;

use chrono::{DateTime, Utc};
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::eviction::{evict, SweepReport};
use super::types::{DiskCache, DiskCacheInner};
use crate::errors::{CacheError, RecoveryHint, Result};

/// Where an instance is in its sweep lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SweepStatus {
    Idle = 0,
    /// A deferred sweep has been scheduled and not started yet
    SweepDue = 1,
    Sweeping = 2,
}

impl SweepStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::SweepDue,
            2 => Self::Sweeping,
            _ => Self::Idle,
        }
    }
}

/// How a scheduled sweep ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    Completed(SweepReport),
    /// The sweep failed; the timestamp was left untouched
    Failed(String),
    /// The cache was dropped, or another sweep ran first
    Skipped,
}

/// Whether a sweep is due `now`, given the last successful sweep.
///
/// A missing timestamp is always due. A timestamp in the future (clock
/// moved backwards) is not.
pub fn is_sweep_due(
    last_sweep: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: Duration,
) -> bool {
    let Some(last_sweep) = last_sweep else {
        return true;
    };
    match (now - last_sweep).to_std() {
        Ok(elapsed) => elapsed >= interval,
        Err(_) => false,
    }
}

impl DiskCacheInner {
    pub(super) fn status(&self) -> SweepStatus {
        SweepStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub(super) fn set_status(&self, status: SweepStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    /// Move from `from` to `Sweeping`; false if the state was not `from`
    pub(super) fn begin_sweep(&self, from: SweepStatus) -> bool {
        self.status
            .compare_exchange(
                from as u8,
                SweepStatus::Sweeping as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Evict and record the sweep time. Caller holds the `Sweeping` state.
    pub(super) fn run_sweep(&self) -> Result<SweepReport> {
        let report =
            evict(&self.root, &self.config).map_err(|e| CacheError::sweep_scan(&self.root, e))?;

        self.preferences
            .set_date(&self.sweep_key, Utc::now())
            .map_err(|e| CacheError::sweep_state(&self.sweep_key, e))?;

        if report.evicted > 0 || report.stale_temp_removed > 0 || report.trash_removed > 0 {
            tracing::info!(
                "Swept {}: evicted {} of {} entries ({} of {} bytes), removed {} stale temp files and {} old trees",
                self.root.display(),
                report.evicted,
                report.scanned,
                report.evicted_bytes,
                report.total_bytes,
                report.stale_temp_removed,
                report.trash_removed
            );
        } else {
            tracing::debug!(
                "Swept {}: {} entries, {} bytes, nothing to evict",
                self.root.display(),
                report.scanned,
                report.total_bytes
            );
        }

        Ok(report)
    }
}

impl DiskCache {
    /// Sweep now, removing least recently used entries until the cache
    /// fits its target size, and record the sweep time.
    ///
    /// Blocks on filesystem I/O. Fails with
    /// [`CacheError::SweepInProgress`] while another sweep of this instance
    /// is running.
    pub fn sweep(&self) -> Result<SweepReport> {
        let inner = &self.inner;
        let started =
            inner.begin_sweep(SweepStatus::Idle) || inner.begin_sweep(SweepStatus::SweepDue);
        if !started {
            return Err(CacheError::SweepInProgress {
                root: inner.root.clone(),
                recovery_hint: RecoveryHint::Retry {
                    after: Duration::from_secs(1),
                },
            });
        }

        let result = inner.run_sweep();
        inner.set_status(SweepStatus::Idle);
        result
    }

    pub fn sweep_status(&self) -> SweepStatus {
        self.inner.status()
    }

    /// Time of the last successful sweep of this root
    pub fn last_sweep(&self) -> Option<DateTime<Utc>> {
        self.inner.preferences.get_date(&self.inner.sweep_key)
    }

    /// Wait for the sweep scheduled at construction, if any.
    ///
    /// Returns `None` when no sweep was scheduled or it was already waited
    /// for.
    pub async fn wait_for_scheduled_sweep(&self) -> Option<SweepOutcome> {
        let handle = self.inner.sweep_handle.lock().take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => Some(SweepOutcome::Failed(e.to_string())),
        }
    }
}
