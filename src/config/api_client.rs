//! Environment loading for the REST API client.
//!
//! Timeouts default to values suited to a CRUD backend with image uploads.
//! Retries are disabled unless `AMALSAS_HTTP_RETRY_MAX_ATTEMPTS` is set, and
//! even then only apply to idempotent reads.

use std::env;
use crate::services::api_client::{ApiClientConfig, RetryConfig};

impl ApiClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let read_timeout_seconds = env::var("AMALSAS_HTTP_READ_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.read_timeout_seconds);

        let write_timeout_seconds = env::var("AMALSAS_HTTP_WRITE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.write_timeout_seconds);

        let connect_timeout_seconds = env::var("AMALSAS_HTTP_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.connect_timeout_seconds);

        let enable_detailed_logging = env::var("AMALSAS_HTTP_DETAILED_LOGGING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.enable_detailed_logging);

        Self {
            read_timeout_seconds,
            write_timeout_seconds,
            connect_timeout_seconds,
            retry: RetryConfig::from_env(),
            enable_detailed_logging,
        }
    }
}

impl RetryConfig {
    /// Load retry configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_attempts = env::var("AMALSAS_HTTP_RETRY_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_attempts);

        let initial_delay_ms = env::var("AMALSAS_HTTP_RETRY_INITIAL_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.initial_delay_ms);

        let max_delay_ms = env::var("AMALSAS_HTTP_RETRY_MAX_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_delay_ms);

        // Comma-separated list, e.g. "502,503,504"
        let retry_on_status = env::var("AMALSAS_HTTP_RETRY_ON_STATUS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse::<u16>().ok())
                    .collect()
            })
            .unwrap_or(defaults.retry_on_status);

        Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
            retry_on_status,
        }
    }
}
