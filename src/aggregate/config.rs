//! Aggregator configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Default per-call deadline shared by both leaf fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration for [`UserAggregator`](crate::aggregate::UserAggregator).
///
/// Named fields with documented defaults, validated once at construction
/// through [`UserAggregator::with_config`](crate::aggregate::UserAggregator::with_config).
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use shardkit::aggregate::AggregatorConfig;
///
/// let config = AggregatorConfig {
///     timeout: Duration::from_secs(1),
///     ..AggregatorConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert!(!config.log_events);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Deadline for the whole call; both fetches share it. Default: 3 s.
    pub timeout: Duration,
    /// Emit a structured event at each terminal outcome. Default: `false`;
    /// leaving logging off is a valid no-op configuration.
    pub log_events: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            log_events: false,
        }
    }
}

impl AggregatorConfig {
    /// Checks the configuration for usable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `timeout` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::new(
                "aggregator timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AggregatorConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!config.log_events);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = AggregatorConfig {
            timeout: Duration::ZERO,
            log_events: false,
        };
        let err = config.validate().unwrap_err();
        assert!(err.message().contains("timeout"));
    }
}
