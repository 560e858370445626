//! Choosing which entries a sweep evicts

use super::EntryInfo;

/// Entries selected for eviction by [`plan_eviction`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionPlan {
    /// Least recently used first
    pub evict: Vec<EntryInfo>,
    pub scanned: usize,
    pub total_bytes: u64,
    /// Size left once every planned eviction succeeds
    pub remaining_bytes: u64,
}

/// Select entries to evict.
///
/// Nothing is evicted while the total size is within `size_limit`. Past
/// it, entries are taken least recently used first until the remaining
/// size is at most `target_size`. Entries with unknown recency are taken
/// before any entry with a known time. Ties keep their input order.
pub fn plan_eviction(
    mut entries: Vec<EntryInfo>,
    size_limit: u64,
    target_size: u64,
) -> EvictionPlan {
    let scanned = entries.len();
    let total_bytes: u64 = entries.iter().map(|e| e.size).sum();

    if total_bytes <= size_limit {
        return EvictionPlan {
            evict: Vec::new(),
            scanned,
            total_bytes,
            remaining_bytes: total_bytes,
        };
    }

    // Most recently used first; `None` orders below every `Some`
    entries.sort_by(|a, b| b.last_used.cmp(&a.last_used));

    let mut remaining_bytes = total_bytes;
    let mut evict = Vec::new();
    while remaining_bytes > target_size {
        let Some(entry) = entries.pop() else {
            break;
        };
        remaining_bytes = remaining_bytes.saturating_sub(entry.size);
        evict.push(entry);
    }

    EvictionPlan {
        evict,
        scanned,
        total_bytes,
        remaining_bytes,
    }
}
