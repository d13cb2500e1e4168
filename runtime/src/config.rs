//! Configuration management for the Tickethub runtime.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Notification bus configuration
    pub bus: BusConfig,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// Notification bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Undelivered notifications retained per subscriber before it is
    /// lagged (default: 256)
    pub capacity: usize,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level filter used when `RUST_LOG` is unset
    /// (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bus: BusConfig {
                capacity: env::var("TICKETHUB_BUS_CAPACITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(256),
            },
            telemetry: TelemetryConfig {
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            },
        }
    }
}

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` when set, falling back to the configured level.
/// Calling this more than once is a no-op.
pub fn init_tracing(config: &TelemetryConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_environment() {
        let config = Config::from_env();
        assert!(config.bus.capacity > 0);
        assert!(!config.telemetry.log_level.is_empty());
    }
}
