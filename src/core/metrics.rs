//! Logger metrics for observability
//!
//! Counters for monitoring the pipeline's health: records dropped by the
//! overflow policy, batches handed to the wrapped logger, and failed
//! submissions that the async consumer swallowed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use batchlog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_enqueued();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_enqueued(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records dropped because the queue was full or closed
    dropped_count: AtomicU64,

    /// Records accepted into the queue (or written directly when synchronous)
    total_enqueued: AtomicU64,

    /// Number of times a producer found the queue full
    queue_full_events: AtomicU64,

    /// Records handed to the wrapped logger
    records_submitted: AtomicU64,

    /// Batch submissions attempted
    batches_submitted: AtomicU64,

    /// Submissions that returned an error or panicked
    batch_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dropped_count: AtomicU64::new(0),
            total_enqueued: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            records_submitted: AtomicU64::new(0),
            batches_submitted: AtomicU64::new(0),
            batch_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_enqueued(&self) -> u64 {
        self.total_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_submitted(&self) -> u64 {
        self.records_submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batches_submitted(&self) -> u64 {
        self.batches_submitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn batch_failures(&self) -> u64 {
        self.batch_failures.load(Ordering::Relaxed)
    }

    /// Record a dropped log, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.total_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one batch of `records` handed to the wrapped logger
    #[inline]
    pub fn record_batch(&self, records: usize) {
        self.batches_submitted.fetch_add(1, Ordering::Relaxed);
        self.records_submitted
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_batch_failure(&self) -> u64 {
        self.batch_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no logs have been processed.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_enqueued() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_enqueued.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.records_submitted.store(0, Ordering::Relaxed);
        self.batches_submitted.store(0, Ordering::Relaxed);
        self.batch_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dropped_count: AtomicU64::new(self.dropped_count()),
            total_enqueued: AtomicU64::new(self.total_enqueued()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            records_submitted: AtomicU64::new(self.records_submitted()),
            batches_submitted: AtomicU64::new(self.batches_submitted()),
            batch_failures: AtomicU64::new(self.batch_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.total_enqueued(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(metrics.records_submitted(), 0);
        assert_eq!(metrics.batches_submitted(), 0);
        assert_eq!(metrics.batch_failures(), 0);
    }

    #[test]
    fn test_metrics_record_dropped() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_dropped(), 0); // Returns previous value
        assert_eq!(metrics.dropped_count(), 1);
        metrics.record_dropped();
        assert_eq!(metrics.dropped_count(), 2);
    }

    #[test]
    fn test_metrics_record_batch() {
        let metrics = LoggerMetrics::new();
        metrics.record_batch(3);
        metrics.record_batch(4);
        assert_eq!(metrics.batches_submitted(), 2);
        assert_eq!(metrics.records_submitted(), 7);
    }

    #[test]
    fn test_metrics_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..100 {
            metrics.record_enqueued();
        }
        assert_eq!(metrics.drop_rate(), 0.0);

        // 100 enqueued, 10 dropped - ~9.09% drop rate
        for _ in 0..10 {
            metrics.record_dropped();
        }
        let rate = metrics.drop_rate();
        assert!(rate > 9.0 && rate < 10.0, "Drop rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_dropped();
        metrics.record_enqueued();
        metrics.record_queue_full();
        metrics.record_batch_failure();

        metrics.reset();

        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.total_enqueued(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(metrics.batch_failures(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_dropped();
        metrics.record_batch(2);

        let snapshot = metrics.clone();
        assert_eq!(snapshot.dropped_count(), 1);
        assert_eq!(snapshot.records_submitted(), 2);

        metrics.record_dropped();
        assert_eq!(metrics.dropped_count(), 2);
        assert_eq!(snapshot.dropped_count(), 1);
    }
}
