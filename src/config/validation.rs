//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ReportServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ReportServiceConfig;

/// Bounded license calls per report: the licensed-user count and the detail lookup.
const LICENSE_CALLS_PER_REPORT: u64 = 2;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &ReportServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    if let Err(e) = Url::parse(&config.license.base_url) {
        errors.push(ValidationError::new(
            "license.base_url",
            format!("'{}' is not a URL: {}", config.license.base_url, e),
        ));
    }
    if config.license.timeout_ms == 0 {
        errors.push(ValidationError::new("license.timeout_ms", "must be > 0"));
    }

    // A report makes two bounded license calls; the request deadline must outlast both.
    let license_budget_ms = config.license.timeout_ms.saturating_mul(LICENSE_CALLS_PER_REPORT);
    if config.listener.request_timeout_secs > 0
        && config.license.timeout_ms > 0
        && config.listener.request_timeout_secs.saturating_mul(1000) <= license_budget_ms
    {
        errors.push(ValidationError::new(
            "listener.request_timeout_secs",
            format!(
                "must exceed {} ms ({} license calls of {} ms)",
                license_budget_ms, LICENSE_CALLS_PER_REPORT, config.license.timeout_ms
            ),
        ));
    }

    if config.breaker.failure_threshold == 0 {
        errors.push(ValidationError::new("breaker.failure_threshold", "must be >= 1"));
    }
    if config.breaker.break_duration_secs == 0 {
        errors.push(ValidationError::new("breaker.break_duration_secs", "must be > 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ReportServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ReportServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.license.base_url = "::nope".into();
        config.breaker.failure_threshold = 0;
        config.breaker.break_duration_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "license.base_url",
                "breaker.failure_threshold",
                "breaker.break_duration_secs",
            ]
        );
    }

    #[test]
    fn test_request_timeout_must_outlast_license_calls() {
        let mut config = ReportServiceConfig::default();
        config.listener.request_timeout_secs = 1;
        config.license.timeout_ms = 5000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.request_timeout_secs");

        // Exactly two license timeouts leaves no room for the rest of the request.
        config.listener.request_timeout_secs = 10;
        assert!(validate_config(&config).is_err());

        config.listener.request_timeout_secs = 11;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ReportServiceConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());
    }
}
