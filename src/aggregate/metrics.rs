//! Outcome counters for aggregation calls.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for aggregation outcomes.
///
/// Every call records exactly one terminal outcome: a success, or one
/// failure broken down by cause. `failures` is the sum of the three cause
/// counters.
pub struct AggregatorMetrics {
    /// Calls that returned a combined result.
    pub successes: AtomicU64,
    /// Calls that surfaced any error.
    pub failures: AtomicU64,
    /// Failures caused by the configured deadline.
    pub timeouts: AtomicU64,
    /// Failures caused by caller-side cancellation.
    pub cancellations: AtomicU64,
    /// Failures caused by a leaf fetch reporting a domain error.
    pub fetch_failures: AtomicU64,
}

impl AggregatorMetrics {
    /// Create a new zeroed metrics instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            cancellations: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
        }
    }

    /// Take a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> AggregatorMetricsSnapshot {
        AggregatorMetricsSnapshot {
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }

    /// Record a combined-result success.
    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a deadline failure.
    pub fn record_timeout(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a caller-cancellation failure.
    pub fn record_cancellation(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a leaf fetch failure.
    pub fn record_fetch_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AggregatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AggregatorMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorMetrics")
            .field("successes", &self.successes.load(Ordering::Relaxed))
            .field("failures", &self.failures.load(Ordering::Relaxed))
            .field("timeouts", &self.timeouts.load(Ordering::Relaxed))
            .field("cancellations", &self.cancellations.load(Ordering::Relaxed))
            .field(
                "fetch_failures",
                &self.fetch_failures.load(Ordering::Relaxed),
            )
            .finish()
    }
}

/// Point-in-time snapshot of [`AggregatorMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorMetricsSnapshot {
    /// Total successes.
    pub successes: u64,
    /// Total failures of any cause.
    pub failures: u64,
    /// Total deadline failures.
    pub timeouts: u64,
    /// Total caller cancellations.
    pub cancellations: u64,
    /// Total leaf fetch failures.
    pub fetch_failures: u64,
}
