//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the pool.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for a delegate pool.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PoolConfig {
    /// Backend server definitions, in selection order.
    pub delegates: Vec<DelegateConfig>,

    /// Background health check settings.
    pub health_check: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DelegateConfig {
    /// Unique delegate identifier, used in logs.
    pub name: String,

    /// Backend address (e.g., "127.0.0.1:8087").
    pub address: String,

    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Run the background health monitor.
    pub enabled: bool,

    /// Seconds between probe passes.
    pub interval_secs: u64,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,
}

impl HealthCheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 5,
            timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record pool metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: PoolConfig = toml::from_str(
            r#"
            [[delegates]]
            name = "riak-1"
            address = "10.0.0.1:8087"
            "#,
        )
        .unwrap();

        assert_eq!(config.delegates.len(), 1);
        assert_eq!(config.delegates[0].connect_timeout_ms, 1000);
        assert!(config.health_check.enabled);
        assert_eq!(config.health_check.interval(), Duration::from_secs(5));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_health_check_override() {
        let config: PoolConfig = toml::from_str(
            r#"
            [health_check]
            interval_secs = 1
            "#,
        )
        .unwrap();

        assert!(config.delegates.is_empty());
        assert_eq!(config.health_check.interval_secs, 1);
        assert_eq!(config.health_check.timeout_secs, 5);
    }
}
