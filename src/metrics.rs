//! Operation counters for the LRU cache (feature `metrics`).
//!
//! Counters are plain `u64` fields bumped through `&mut self` on mutating
//! paths, plus [`MetricsCell`] for the read-only paths (`peek`,
//! `peek_lru`) that only hold `&self`. Metrics are observational and
//! never affect cache behavior.

use std::sync::atomic::{AtomicU64, Ordering};

/// A metrics-only counter cell for `&self` paths.
///
/// Backed by an `AtomicU64` with relaxed ordering: the concurrent wrapper
/// lets multiple `peek` callers hold the read lock at once, so the bump
/// must be atomic. Relaxed suffices because counters carry no ordering
/// obligations toward any other state.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(AtomicU64);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Running counters maintained by [`LruCache`](crate::policy::lru::LruCache).
#[derive(Debug, Default)]
pub struct LruMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evicted_entries: u64,
    pub remove_calls: u64,
    pub pop_lru_calls: u64,
    pub touch_calls: u64,
    pub peek_calls: MetricsCell,
}

/// Point-in-time copy of [`LruMetrics`] plus cache occupancy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,
    pub remove_calls: u64,
    pub pop_lru_calls: u64,
    pub touch_calls: u64,
    pub peek_calls: u64,

    pub len: usize,
    pub capacity: usize,
}

impl LruMetricsSnapshot {
    /// Hit ratio over all `get` calls, or `None` before the first `get`.
    pub fn hit_ratio(&self) -> Option<f64> {
        if self.get_calls == 0 {
            None
        } else {
            Some(self.get_hits as f64 / self.get_calls as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_starts_at_zero_and_increments() {
        let cell = MetricsCell::new();
        assert_eq!(cell.get(), 0);
        cell.incr();
        cell.incr();
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn hit_ratio_is_none_before_first_get() {
        let snap = LruMetricsSnapshot::default();
        assert_eq!(snap.hit_ratio(), None);
    }

    #[test]
    fn hit_ratio_divides_hits_by_calls() {
        let snap = LruMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            ..Default::default()
        };
        assert_eq!(snap.hit_ratio(), Some(0.75));
    }
}
