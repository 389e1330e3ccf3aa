//! Deadline-bound fan-out aggregation with cancellation propagation.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::aggregate::backend::{FetchError, UserBackend};
use crate::aggregate::config::AggregatorConfig;
use crate::aggregate::metrics::{AggregatorMetrics, AggregatorMetricsSnapshot};
use crate::error::ConfigError;

// ── AggregateError ──────────────────────────────────────────────────

/// Terminal errors surfaced by [`UserAggregator::aggregate`].
///
/// Exactly one is produced per failed call; when several sub-operations
/// fail concurrently, the first cause observed is retained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    /// The configured deadline elapsed before both fetches completed.
    #[error("aggregation timed out after {0:?}")]
    DeadlineExceeded(Duration),

    /// The caller's cancellation scope was cancelled externally.
    #[error("aggregation cancelled by caller")]
    Cancelled,

    /// A leaf fetch reported a domain error.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

// ── UserAggregator ──────────────────────────────────────────────────

/// Fans out the two per-user fetches under one shared deadline.
///
/// Each call derives a child cancellation scope from the caller's token and
/// the configured timeout, then launches both fetches as independent tasks.
/// Every task races its fetch against the scope; the first real failure is
/// retained in a first-error-wins slot and cancels the scope, so the
/// sibling abandons outstanding work at its next suspension point. Both
/// tasks are always joined before the call returns; a failure never leaks
/// the surviving task.
///
/// The caller receives either the combined line (`"<profile> | <orders>"`)
/// or a single [`AggregateError`], never a partial result. Outcomes are
/// counted in [`AggregatorMetrics`]; structured events are emitted only
/// when [`AggregatorConfig::log_events`] is set, and a missing subscriber
/// is a valid no-op.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use shardkit::aggregate::{SimulatedBackend, UserAggregator};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = SimulatedBackend::with_latencies(
///     Duration::from_millis(20),
///     Duration::from_millis(5),
/// );
/// let aggregator = UserAggregator::new(backend);
///
/// let result = aggregator.aggregate(&CancellationToken::new(), 1).await;
/// assert_eq!(result.unwrap(), "Name: Alice | Order: 5");
/// # }
/// ```
#[derive(Debug)]
pub struct UserAggregator<B> {
    backend: Arc<B>,
    config: AggregatorConfig,
    metrics: Arc<AggregatorMetrics>,
}

impl<B> UserAggregator<B>
where
    B: UserBackend + 'static,
{
    /// Creates an aggregator with the default configuration.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            config: AggregatorConfig::default(),
            metrics: Arc::new(AggregatorMetrics::new()),
        }
    }

    /// Creates an aggregator with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails
    /// [`AggregatorConfig::validate`].
    pub fn with_config(backend: B, config: AggregatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            backend: Arc::new(backend),
            config,
            metrics: Arc::new(AggregatorMetrics::new()),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Point-in-time snapshot of the outcome counters.
    #[must_use]
    pub fn metrics(&self) -> AggregatorMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Fetches profile and orders for `id` concurrently and combines them.
    ///
    /// The shared scope is cancelled by whichever fires first: the
    /// configured deadline, the caller's `cancel` token, or a failing
    /// fetch. Cancellation is cooperative, observed by each task at its
    /// own suspension point, and both tasks are joined before returning,
    /// whatever the outcome.
    pub async fn aggregate(
        &self,
        cancel: &CancellationToken,
        id: u64,
    ) -> Result<String, AggregateError> {
        let scope = cancel.child_token();
        let first_error: Arc<OnceLock<AggregateError>> = Arc::new(OnceLock::new());
        let started = Instant::now();

        let mut profile_task = {
            let backend = Arc::clone(&self.backend);
            let scope = scope.clone();
            let first_error = Arc::clone(&first_error);
            tokio::spawn(async move {
                let result = tokio::select! {
                    result = backend.fetch_profile(id) => result.map_err(AggregateError::from),
                    () = scope.cancelled() => Err(AggregateError::Cancelled),
                };
                if let Err(error) = &result {
                    // Own failures become the first cause and stop the
                    // sibling; a cancelled arm is a consequence, not a cause.
                    if !matches!(error, AggregateError::Cancelled) {
                        let _ = first_error.set(error.clone());
                        scope.cancel();
                    }
                }
                result
            })
        };

        let mut orders_task = {
            let backend = Arc::clone(&self.backend);
            let scope = scope.clone();
            let first_error = Arc::clone(&first_error);
            tokio::spawn(async move {
                let result = tokio::select! {
                    result = backend.fetch_order(id) => result.map_err(AggregateError::from),
                    () = scope.cancelled() => Err(AggregateError::Cancelled),
                };
                if let Err(error) = &result {
                    if !matches!(error, AggregateError::Cancelled) {
                        let _ = first_error.set(error.clone());
                        scope.cancel();
                    }
                }
                result
            })
        };

        // Bound each join by what is left of the shared deadline. On expiry,
        // record the deadline as first cause, cancel the scope, and still
        // join the task so nothing outlives the call.
        let profile_joined = match tokio::time::timeout(self.config.timeout, &mut profile_task)
            .await
        {
            Ok(joined) => joined,
            Err(_) => {
                let _ = first_error.set(AggregateError::DeadlineExceeded(self.config.timeout));
                scope.cancel();
                profile_task.await
            },
        };

        // A task that did not run to completion cannot have recorded its own
        // failure, so the join-level error becomes the first cause and stops
        // the sibling before it is awaited.
        let profile_result = flatten_join(profile_joined);
        note_failure(&profile_result, &first_error, &scope);

        let remaining = self.config.timeout.saturating_sub(started.elapsed());
        let orders_joined = match tokio::time::timeout(remaining, &mut orders_task).await {
            Ok(joined) => joined,
            Err(_) => {
                let _ = first_error.set(AggregateError::DeadlineExceeded(self.config.timeout));
                scope.cancel();
                orders_task.await
            },
        };

        let orders_result = flatten_join(orders_joined);
        note_failure(&orders_result, &first_error, &scope);

        match (profile_result, orders_result) {
            (Ok(profile), Ok(orders)) => {
                let combined = format!("{profile} | {orders}");
                self.metrics.record_success();
                if self.config.log_events {
                    tracing::info!(id, result = %combined, "aggregation complete");
                }
                Ok(combined)
            },
            (profile_result, orders_result) => {
                let error = match first_error.get() {
                    Some(error) => error.clone(),
                    None => profile_result
                        .err()
                        .or_else(|| orders_result.err())
                        .unwrap_or(AggregateError::Cancelled),
                };
                match &error {
                    AggregateError::DeadlineExceeded(_) => self.metrics.record_timeout(),
                    AggregateError::Cancelled => self.metrics.record_cancellation(),
                    AggregateError::Fetch(_) => self.metrics.record_fetch_failure(),
                }
                if self.config.log_events {
                    tracing::warn!(id, error = %error, "aggregation failed");
                }
                Err(error)
            },
        }
    }
}

/// Folds a join result into the task's own outcome. A fetch task that did
/// not run to completion surfaces as an unavailable backend rather than
/// being swallowed.
fn flatten_join(
    joined: Result<Result<String, AggregateError>, JoinError>,
) -> Result<String, AggregateError> {
    match joined {
        Ok(result) => result,
        Err(join_error) => Err(AggregateError::Fetch(FetchError::Unavailable(format!(
            "fetch task failed: {join_error}"
        )))),
    }
}

/// Records a failure the task itself could not record (a panic or abort
/// surfaces only at join time) as the first cause and cancels the scope.
/// A cancelled arm is a consequence of an earlier cause, never a cause.
fn note_failure(
    result: &Result<String, AggregateError>,
    first_error: &OnceLock<AggregateError>,
    scope: &CancellationToken,
) {
    if let Err(error) = result {
        if !matches!(error, AggregateError::Cancelled) {
            let _ = first_error.set(error.clone());
            scope.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::backend::SimulatedBackend;

    fn fast_backend() -> SimulatedBackend {
        SimulatedBackend::with_latencies(Duration::from_millis(40), Duration::from_millis(10))
    }

    #[test]
    fn error_display_timeout() {
        let error = AggregateError::DeadlineExceeded(Duration::from_secs(1));
        assert_eq!(error.to_string(), "aggregation timed out after 1s");
    }

    #[test]
    fn error_display_cancelled() {
        assert_eq!(
            AggregateError::Cancelled.to_string(),
            "aggregation cancelled by caller"
        );
    }

    #[test]
    fn error_wraps_fetch_cause() {
        let error = AggregateError::from(FetchError::UnknownId(3));
        assert_eq!(error.to_string(), "fetch failed: unknown subject id 3");
    }

    #[test]
    fn with_config_rejects_zero_timeout() {
        let config = AggregatorConfig {
            timeout: Duration::ZERO,
            log_events: false,
        };
        let result = UserAggregator::with_config(SimulatedBackend::new(), config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn aggregate_combines_both_lines() {
        let aggregator = UserAggregator::new(fast_backend());
        let result = aggregator.aggregate(&CancellationToken::new(), 1).await;
        assert_eq!(result.unwrap(), "Name: Alice | Order: 5");
        assert_eq!(aggregator.metrics().successes, 1);
    }

    #[tokio::test]
    async fn aggregate_times_out_on_slow_profile() {
        let config = AggregatorConfig {
            timeout: Duration::from_millis(50),
            log_events: false,
        };
        let backend =
            SimulatedBackend::with_latencies(Duration::from_millis(400), Duration::from_millis(5));
        let aggregator = UserAggregator::with_config(backend, config).unwrap();

        let result = aggregator.aggregate(&CancellationToken::new(), 1).await;
        assert_eq!(
            result.unwrap_err(),
            AggregateError::DeadlineExceeded(Duration::from_millis(50))
        );
        assert_eq!(aggregator.metrics().timeouts, 1);
    }
}
