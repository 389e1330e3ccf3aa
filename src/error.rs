//! Error types for the shardkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction-time parameters are invalid
//!   (e.g. a zero aggregation timeout). Runtime failures of the aggregator
//!   use [`AggregateError`](crate::aggregate::AggregateError); the map
//!   operations are total and never fail.
//!
//! ## Example Usage
//!
//! ```
//! use shardkit::error::ConfigError;
//!
//! fn check_timeout(millis: u64) -> Result<(), ConfigError> {
//!     if millis == 0 {
//!         return Err(ConfigError::new("timeout must be greater than zero"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_timeout(0).is_err());
//! assert!(check_timeout(250).is_ok());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`UserAggregator::with_config`](crate::aggregate::UserAggregator::with_config).
/// Carries a human-readable description of which parameter failed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
