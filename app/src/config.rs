//! Configuration management for the TripSync client.
//!
//! Loads configuration from environment variables (after `.env` has been
//! applied by the binary) with sensible defaults.

use std::env;
use std::time::Duration;
use tripsync_api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Default notification lifetime in milliseconds.
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 4_000;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "tripsync=info,tripsync_runtime=info,tripsync_api=info";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Base URL is empty
    #[error("TRIPSYNC_API_BASE_URL must not be empty")]
    EmptyBaseUrl,

    /// Base URL is not an http(s) URL
    #[error("TRIPSYNC_API_BASE_URL must start with http:// or https:// (got {0:?})")]
    UnsupportedScheme(String),

    /// Timeout of zero would fail every request
    #[error("TRIPSYNC_API_TIMEOUT_MS must be greater than zero")]
    ZeroTimeout,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote API configuration
    pub api: ApiConfig,
    /// Terminal UI configuration
    pub ui: UiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every API path is appended to
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Terminal UI configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    /// How long a notification stays visible, in milliseconds
    pub notification_ttl_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_ms: u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(10_000),
            },
            ui: UiConfig {
                notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            },
            logging: LoggingConfig {
                filter: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `TRIPSYNC_API_BASE_URL`: API base URL (default: `http://localhost:8080/api`)
    /// - `TRIPSYNC_API_TIMEOUT_MS`: request timeout (default: 10000)
    /// - `TRIPSYNC_NOTIFICATION_TTL_MS`: notification lifetime (default: 4000)
    /// - `RUST_LOG`: log filter (default: `tripsync=info,...`)
    ///
    /// Unparseable numbers fall back to their defaults; call
    /// [`Config::validate`] before use.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api: ApiConfig {
                base_url: lookup("TRIPSYNC_API_BASE_URL").unwrap_or(defaults.api.base_url),
                timeout_ms: lookup("TRIPSYNC_API_TIMEOUT_MS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.api.timeout_ms),
            },
            ui: UiConfig {
                notification_ttl_ms: lookup("TRIPSYNC_NOTIFICATION_TTL_MS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.ui.notification_ttl_ms),
            },
            logging: LoggingConfig {
                filter: lookup("RUST_LOG").unwrap_or(defaults.logging.filter),
            },
        }
    }

    /// Check the values the client cannot run with
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty or non-http base URL, or a
    /// zero request timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(base_url.to_string()));
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Per-request timeout
    #[must_use]
    pub const fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    /// Notification lifetime
    #[must_use]
    pub const fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.ui.notification_ttl_ms)
    }
}
