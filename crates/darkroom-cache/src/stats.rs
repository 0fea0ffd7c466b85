//! Hit/miss counters for the media cache.

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fetches served from the memory tier.
    pub memory_hits: u64,
    /// Fetches served from the disk tier.
    pub disk_hits: u64,
    /// Fetches that reached the origin.
    pub origin_fetches: u64,
    /// Origin fetches that failed.
    pub origin_failures: u64,
    /// Disk reads or writes that failed and were treated as misses.
    pub disk_errors: u64,
    /// Entries removed by disk eviction.
    pub disk_evictions: u64,
}

impl CacheStats {
    /// Share of fetches answered without the origin, as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.memory_hits + self.disk_hits;
        let total = hits + self.origin_fetches;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub memory_hits: AtomicU64,
    pub disk_hits: AtomicU64,
    pub origin_fetches: AtomicU64,
    pub origin_failures: AtomicU64,
    pub disk_errors: AtomicU64,
}

impl Counters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, disk_evictions: u64) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            disk_hits: self.disk_hits.load(Ordering::Relaxed),
            origin_fetches: self.origin_fetches.load(Ordering::Relaxed),
            origin_failures: self.origin_failures.load(Ordering::Relaxed),
            disk_errors: self.disk_errors.load(Ordering::Relaxed),
            disk_evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_empty_is_zero() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_counts_both_tiers() {
        let stats = CacheStats {
            memory_hits: 2,
            disk_hits: 1,
            origin_fetches: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 75.0);
    }
}
