//! Configuration management for the storefront.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use stellar_burger_runtime::StoreConfig;

const BROADCAST_CAPACITY: &str = "STOREFRONT_BROADCAST_CAPACITY";
const SHUTDOWN_TIMEOUT_SECS: &str = "STOREFRONT_SHUTDOWN_TIMEOUT_SECS";
const REQUEST_TIMEOUT_SECS: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";
const FEED_POLL_INTERVAL_MS: &str = "STOREFRONT_FEED_POLL_INTERVAL_MS";
const STATUS_BOARD_LIMIT: &str = "STOREFRONT_STATUS_BOARD_LIMIT";

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Settlement actions buffered for slow observers
    pub broadcast_capacity: usize,
    /// How long shutdown waits for in-flight requests
    pub shutdown_timeout: Duration,
    /// How long the facade waits for a request to settle
    pub request_timeout: Duration,
    /// Delay between live feed polls
    pub feed_poll_interval: Duration,
    /// Orders shown per status-board column
    pub status_board_limit: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 64,
            shutdown_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(15),
            feed_poll_interval: Duration::from_millis(5000),
            status_board_limit: 20,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but cannot be parsed or is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but cannot be parsed or is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            broadcast_capacity: parse(&lookup, BROADCAST_CAPACITY, "count")?
                .unwrap_or(defaults.broadcast_capacity),
            shutdown_timeout: parse(&lookup, SHUTDOWN_TIMEOUT_SECS, "number of seconds")?
                .map_or(defaults.shutdown_timeout, Duration::from_secs),
            request_timeout: parse(&lookup, REQUEST_TIMEOUT_SECS, "number of seconds")?
                .map_or(defaults.request_timeout, Duration::from_secs),
            feed_poll_interval: parse(&lookup, FEED_POLL_INTERVAL_MS, "number of milliseconds")?
                .map_or(defaults.feed_poll_interval, Duration::from_millis),
            status_board_limit: parse(&lookup, STATUS_BOARD_LIMIT, "count")?
                .unwrap_or(defaults.status_board_limit),
        };

        tracing::debug!(?config, "storefront configuration loaded");
        Ok(config)
    }

    /// Runtime settings derived from this configuration.
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity, self.shutdown_timeout)
    }
}

/// Parse a positive number from `key`, or `None` if unset or blank.
fn parse<F, T>(
    lookup: &F,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed.parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.clone(),
        expected,
    })?;
    if value == T::default() {
        return Err(ConfigError::Zero { key });
    }
    Ok(Some(value))
}
