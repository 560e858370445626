//! Deferred sweep task

use chrono::Utc;
use std::sync::Arc;
use tokio::runtime::Handle;

use super::{is_sweep_due, SweepOutcome, SweepStatus};
use crate::core::types::DiskCache;

/// Check whether `cache` is due for a sweep and, if so, spawn one on
/// `handle` after the configured initial delay.
///
/// Runs once per instance, from the builder.
pub(crate) fn schedule_sweep_if_due(cache: &DiskCache, handle: &Handle) {
    let inner = &cache.inner;
    let last_sweep = inner.preferences.get_date(&inner.sweep_key);
    if !is_sweep_due(last_sweep, Utc::now(), inner.config.sweep_interval) {
        tracing::debug!(
            "No sweep due for {} (last sweep {:?})",
            inner.root.display(),
            last_sweep
        );
        return;
    }

    inner.set_status(SweepStatus::SweepDue);
    let delay = inner.config.initial_sweep_delay;
    let weak = Arc::downgrade(inner);

    let task = handle.spawn(async move {
        tokio::time::sleep(delay).await;

        let Some(inner) = weak.upgrade() else {
            return SweepOutcome::Skipped;
        };
        if !inner.begin_sweep(SweepStatus::SweepDue) {
            return SweepOutcome::Skipped;
        }

        let sweeping = Arc::clone(&inner);
        let result = tokio::task::spawn_blocking(move || sweeping.run_sweep()).await;
        inner.set_status(SweepStatus::Idle);

        match result {
            Ok(Ok(report)) => SweepOutcome::Completed(report),
            Ok(Err(e)) => {
                tracing::warn!("Cache sweep of {} failed: {}", inner.root.display(), e);
                SweepOutcome::Failed(e.to_string())
            }
            Err(e) => {
                tracing::warn!("Cache sweep of {} panicked: {}", inner.root.display(), e);
                SweepOutcome::Failed(e.to_string())
            }
        }
    });

    *inner.sweep_handle.lock() = Some(task);
}
