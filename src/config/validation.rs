//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0, ports valid)
//! - Detect duplicate delegate names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PoolConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::PoolConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("health_check.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("health_check.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("delegate #{0} has an empty name")]
    EmptyName(usize),

    #[error("duplicate delegate name '{0}'")]
    DuplicateName(String),

    #[error("delegate '{name}' has invalid address '{address}' (expected host:port)")]
    InvalidAddress { name: String, address: String },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &PoolConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    for (i, delegate) in config.delegates.iter().enumerate() {
        if delegate.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(i));
        } else if !seen.insert(delegate.name.as_str()) {
            errors.push(ValidationError::DuplicateName(delegate.name.clone()));
        }

        if !is_host_port(&delegate.address) {
            errors.push(ValidationError::InvalidAddress {
                name: delegate.name.clone(),
                address: delegate.address.clone(),
            });
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_host_port(address: &str) -> bool {
    match address.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().map_or(false, |p| p > 0),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DelegateConfig;

    fn delegate(name: &str, address: &str) -> DelegateConfig {
        DelegateConfig {
            name: name.into(),
            address: address.into(),
            connect_timeout_ms: 1000,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&PoolConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = PoolConfig::default();
        config.health_check.interval_secs = 0;
        config.observability.log_level = "loud".into();
        config.delegates.push(delegate("a", "127.0.0.1:8087"));
        config.delegates.push(delegate("a", "127.0.0.1:8088"));
        config.delegates.push(delegate("b", "no-port"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroInterval,
                ValidationError::DuplicateName("a".into()),
                ValidationError::InvalidAddress {
                    name: "b".into(),
                    address: "no-port".into(),
                },
                ValidationError::UnknownLogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn test_address_forms() {
        assert!(is_host_port("localhost:8087"));
        assert!(is_host_port("[::1]:8087"));
        assert!(!is_host_port(":8087"));
        assert!(!is_host_port("host:0"));
        assert!(!is_host_port("host:http"));
    }
}
