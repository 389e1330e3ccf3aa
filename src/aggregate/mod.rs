//! Bounded fan-out aggregation under a shared deadline.
//!
//! [`UserAggregator`] launches the two per-user leaf fetches concurrently,
//! propagates cancellation the instant either fails or the deadline
//! expires, and surfaces exactly one outcome per call. The leaf seam is
//! [`UserBackend`]; [`SimulatedBackend`] provides the reference leaves.

pub mod aggregator;
pub mod backend;
pub mod config;
pub mod metrics;

pub use aggregator::{AggregateError, UserAggregator};
pub use backend::{FetchError, SimulatedBackend, UserBackend};
pub use config::{AggregatorConfig, DEFAULT_TIMEOUT};
pub use metrics::{AggregatorMetrics, AggregatorMetricsSnapshot};
