//! Cache Statistics Module
//!
//! Tracks reads, lazy expirations and sweep activity.

use serde::Serialize;

// == Cache Stats ==
/// Counters for a single cache store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a live value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Expired entries found and removed by `get`
    pub lazy_expirations: u64,
    /// Completed bulk expiry deletes
    pub sweeps: u64,
    /// Documents removed by sweeps
    pub swept_entries: u64,
    /// Bulk expiry deletes that failed
    pub sweep_failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// A read found an expired entry; also counts as a miss.
    pub fn record_lazy_expiration(&mut self) {
        self.lazy_expirations += 1;
        self.misses += 1;
    }

    pub fn record_sweep(&mut self, removed: u64) {
        self.sweeps += 1;
        self.swept_entries += removed;
    }

    pub fn record_sweep_failure(&mut self) {
        self.sweep_failures += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_lazy_expiration_counts_as_miss() {
        let mut stats = CacheStats::new();
        stats.record_lazy_expiration();
        assert_eq!(stats.lazy_expirations, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_record_sweeps() {
        let mut stats = CacheStats::new();
        stats.record_sweep(3);
        stats.record_sweep(0);
        stats.record_sweep_failure();
        assert_eq!(stats.sweeps, 2);
        assert_eq!(stats.swept_entries, 3);
        assert_eq!(stats.sweep_failures, 1);
    }
}
