//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ReportServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ReportServiceConfig, ConfigError> {
    let config: ReportServiceConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ReportServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.license.timeout_ms, 5000);
        assert_eq!(config.breaker.failure_threshold, 2);
        assert_eq!(config.breaker.break_duration_secs, 10);
        assert!(config.storage.seed_path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [license]
            base_url = "http://licenses.internal:8000/api/"
            timeout_ms = 250

            [breaker]
            failure_threshold = 5

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.license.base_url, "http://licenses.internal:8000/api/");
        assert_eq!(config.license.timeout_ms, 250);
        assert_eq!(config.breaker.failure_threshold, 5);
        assert_eq!(config.breaker.break_duration_secs, 10);
        assert_eq!(config.observability.log_format, crate::config::LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = parse_config(
            r#"
            [license]
            timeout_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(parse_config("[license"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/backup-report.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
