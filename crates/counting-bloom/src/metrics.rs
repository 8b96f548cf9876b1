//! Operation metrics for counting Bloom filters
//!
//! The filter itself records nothing; callers time operations and feed
//! them to a [`MetricsRecorder`].
//!
//! ```
//! use std::time::Instant;
//! use counting_bloom::{CountingBloomFilter, Metrics};
//!
//! let filter = CountingBloomFilter::new();
//! let metrics = Metrics::new();
//!
//! let start = Instant::now();
//! filter.add("element");
//! metrics.record_add(start.elapsed());
//!
//! let start = Instant::now();
//! let found = filter.contains("element");
//! metrics.record_lookup(start.elapsed(), found);
//!
//! assert_eq!(metrics.snapshot().lookups_positive, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Thread-safe operation counters and cumulative timings.
#[derive(Default)]
pub struct Metrics {
    /// Total add calls
    pub adds: AtomicU64,
    /// Total delete calls
    pub deletes: AtomicU64,
    /// Total contains calls
    pub lookups: AtomicU64,
    /// Contains calls that returned true
    pub lookups_positive: AtomicU64,
    /// Cumulative add time in nanoseconds
    pub add_time_ns: AtomicU64,
    /// Cumulative delete time in nanoseconds
    pub delete_time_ns: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_add(&self, duration: Duration) {
        self.adds.fetch_add(1, Ordering::Relaxed);
        self.add_time_ns.fetch_add(nanos(duration), Ordering::Relaxed);
    }

    pub fn record_delete(&self, duration: Duration) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.delete_time_ns.fetch_add(nanos(duration), Ordering::Relaxed);
    }

    /// Record a lookup; `found` may be a false positive.
    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns.fetch_add(nanos(duration), Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            adds: self.adds.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            avg_add_ns: average(&self.add_time_ns, &self.adds),
            avg_delete_ns: average(&self.delete_time_ns, &self.deletes),
            avg_lookup_ns: average(&self.lookup_time_ns, &self.lookups),
        }
    }

    /// Ratio of positive lookups to all lookups.
    ///
    /// Against a set of never-added elements this is the observed false
    /// positive rate.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        for counter in [
            &self.adds,
            &self.deletes,
            &self.lookups,
            &self.lookups_positive,
            &self.add_time_ns,
            &self.delete_time_ns,
            &self.lookup_time_ns,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

fn average(total: &AtomicU64, count: &AtomicU64) -> u64 {
    let count = count.load(Ordering::Relaxed);
    if count > 0 {
        total.load(Ordering::Relaxed) / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub adds: u64,
    pub deletes: u64,
    pub lookups: u64,
    pub lookups_positive: u64,
    pub avg_add_ns: u64,
    pub avg_delete_ns: u64,
    pub avg_lookup_ns: u64,
}

/// Sink for filter operation metrics
///
/// Implement this to forward measurements to an external system.
pub trait MetricsRecorder: Send + Sync {
    fn record_add(&self, duration: Duration);

    fn record_delete(&self, duration: Duration);

    fn record_lookup(&self, duration: Duration, found: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_add(&self, _: Duration) {}
    fn record_delete(&self, _: Duration) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_add(&self, duration: Duration) {
        Metrics::record_add(self, duration);
    }

    fn record_delete(&self, duration: Duration) {
        Metrics::record_delete(self, duration);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }
}
