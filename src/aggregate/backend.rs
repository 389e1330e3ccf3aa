//! Leaf fetch backends for user aggregation.
//!
//! [`UserBackend`] is the seam between the aggregator and whatever actually
//! serves profile and order data. Its async methods return unboxed futures
//! (RPITIT, Rust 1.75+). The aggregator races each returned future against
//! a shared cancellation signal, so an abandoned fetch is simply dropped at
//! its next suspension point.

use std::future::Future;
use std::time::Duration;

/// Errors a leaf fetch can report.
///
/// The simulated backend never produces one; the variants exist so real
/// backends have a domain-error channel that the aggregator propagates
/// as a first cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The backend could not serve the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The subject id is unknown to the backend.
    #[error("unknown subject id {0}")]
    UnknownId(u64),
}

/// Async source of per-user profile and order data.
///
/// Contract: resolve to the fetched line after the backend's own latency,
/// or report a [`FetchError`]. Implementations do not need to watch for
/// cancellation themselves; the caller races these futures against its
/// cancellation scope.
pub trait UserBackend: Send + Sync {
    /// Fetch the profile line for `id`.
    fn fetch_profile(&self, id: u64) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Fetch the order line for `id`.
    fn fetch_order(&self, id: u64) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Simulated leaves standing in for real profile and order services.
///
/// Sleeps for a fixed latency per fetch, then resolves to a canned line
/// (`"Name: Alice"` / `"Order: 5"`). Never fails on its own. The canonical
/// latencies are 2 s for the profile and 500 ms for the orders; tests scale
/// them down with [`with_latencies`](SimulatedBackend::with_latencies).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedBackend {
    profile_latency: Duration,
    order_latency: Duration,
}

impl SimulatedBackend {
    /// Simulated backend with the canonical latencies.
    pub fn new() -> Self {
        Self {
            profile_latency: Duration::from_secs(2),
            order_latency: Duration::from_millis(500),
        }
    }

    /// Simulated backend with custom per-fetch latencies.
    pub fn with_latencies(profile_latency: Duration, order_latency: Duration) -> Self {
        Self {
            profile_latency,
            order_latency,
        }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl UserBackend for SimulatedBackend {
    fn fetch_profile(&self, id: u64) -> impl Future<Output = Result<String, FetchError>> + Send {
        let latency = self.profile_latency;
        async move {
            tracing::debug!(id, "fetching profile");
            tokio::time::sleep(latency).await;
            Ok("Name: Alice".to_string())
        }
    }

    fn fetch_order(&self, id: u64) -> impl Future<Output = Result<String, FetchError>> + Send {
        let latency = self.order_latency;
        async move {
            tracing::debug!(id, "fetching order");
            tokio::time::sleep(latency).await;
            Ok("Order: 5".to_string())
        }
    }
}
