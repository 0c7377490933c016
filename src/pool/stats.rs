// src/pool/stats.rs
//! Pool-wide statistics, tracked with relaxed atomics (§8's quantified
//! invariants are read back through these counters in tests).

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub(crate) struct PoolStatsInner {
    total_rents: AtomicUsize,
    total_returns: AtomicUsize,
    pool_hits: AtomicUsize,
    pool_misses: AtomicUsize,
    pool_rejects: AtomicUsize,
}

impl PoolStatsInner {
    pub(crate) fn record_hit(&self) {
        self.total_rents.fetch_add(1, Ordering::Relaxed);
        self.pool_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.total_rents.fetch_add(1, Ordering::Relaxed);
        self.pool_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_return(&self) {
        self.total_returns.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_reject(&self) {
        self.pool_rejects.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PoolStatistics {
        PoolStatistics {
            total_rents: self.total_rents.load(Ordering::Relaxed),
            total_returns: self.total_returns.load(Ordering::Relaxed),
            pool_hits: self.pool_hits.load(Ordering::Relaxed),
            pool_misses: self.pool_misses.load(Ordering::Relaxed),
            pool_rejects: self.pool_rejects.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of pool activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStatistics {
    /// Total number of `rent` calls.
    pub total_rents: usize,
    /// Total number of messages returned (pushed back or evicted).
    pub total_returns: usize,
    /// Rents satisfied from an existing pooled buffer.
    pub pool_hits: usize,
    /// Rents that allocated a fresh buffer (bucket empty, or size unpoolable).
    pub pool_misses: usize,
    /// Returns that found their bucket full and were evicted instead of
    /// pooled.
    pub pool_rejects: usize,
}

impl PoolStatistics {
    /// Messages rented but not yet returned.
    pub fn outstanding(&self) -> usize {
        self.total_rents.saturating_sub(self.total_returns)
    }

    /// Share of rents satisfied without a fresh allocation, as a percentage.
    pub fn hit_rate(&self) -> f64 {
        if self.total_rents == 0 {
            return 0.0;
        }
        (self.pool_hits as f64 / self.total_rents as f64) * 100.0
    }

    /// Share of returns that were evicted rather than pooled, as a
    /// percentage.
    pub fn reject_rate(&self) -> f64 {
        if self.total_returns == 0 {
            return 0.0;
        }
        (self.pool_rejects as f64 / self.total_returns as f64) * 100.0
    }
}
