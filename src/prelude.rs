pub use crate::ds::{Fnv1a64, ShardKey, ShardSelector, TextKey};
pub use crate::error::ConfigError;
pub use crate::store::{ConcurrentMap, ShardedMap, StripedMap};

#[cfg(feature = "aggregate")]
pub use crate::aggregate::{
    AggregateError, AggregatorConfig, AggregatorMetricsSnapshot, FetchError, SimulatedBackend,
    UserAggregator, UserBackend,
};
