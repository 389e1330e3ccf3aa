use std::time::Duration;

use shardkit::aggregate::{AggregatorConfig, SimulatedBackend, UserAggregator};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cancel = CancellationToken::new();

    // Generous budget: both fetches (2s profile, 500ms orders) fit in 3s.
    let aggregator = UserAggregator::new(SimulatedBackend::new());
    match aggregator.aggregate(&cancel, 1).await {
        Ok(combined) => println!("result: {combined}"),
        Err(error) => println!("error: {error}"),
    }

    // Tight budget: the 2s profile fetch blows the 1s deadline, and the
    // orders task is released by the shared cancellation scope.
    let config = AggregatorConfig {
        timeout: Duration::from_secs(1),
        ..AggregatorConfig::default()
    };
    let aggregator = match UserAggregator::with_config(SimulatedBackend::new(), config) {
        Ok(aggregator) => aggregator,
        Err(error) => {
            eprintln!("bad config: {error}");
            return;
        },
    };
    match aggregator.aggregate(&cancel, 1).await {
        Ok(combined) => println!("result: {combined}"),
        Err(error) => println!("error: {error}"),
    }
}

// Expected output (about three seconds total):
// result: Name: Alice | Order: 5
// error: aggregation timed out after 1s
