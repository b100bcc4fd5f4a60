//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the user store (optionally seeded from JSON)
//! - Build the license provider from its base URL
//! - Assemble the orchestrator with a fresh breaker

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::config::ReportServiceConfig;
use crate::license::HttpLicenseProvider;
use crate::report::ReportOrchestrator;
use crate::storage::InMemoryUserStore;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load user seed '{path}': {source}")]
    Seed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid license service URL: {0}")]
    LicenseUrl(#[from] url::ParseError),
}

/// Build the store, license provider and orchestrator described by `config`.
pub fn build_orchestrator(config: &ReportServiceConfig) -> Result<ReportOrchestrator, StartupError> {
    let store = match &config.storage.seed_path {
        Some(path) => InMemoryUserStore::load_from_file(Path::new(path)).map_err(|source| {
            StartupError::Seed {
                path: path.clone(),
                source,
            }
        })?,
        None => {
            tracing::warn!("No user seed configured, starting with an empty store");
            InMemoryUserStore::default()
        }
    };

    let base_url = Url::parse(&config.license.base_url)?;
    tracing::info!(
        license_url = %base_url,
        timeout_ms = config.license.timeout_ms,
        failure_threshold = config.breaker.failure_threshold,
        break_duration_secs = config.breaker.break_duration_secs,
        "License service configured"
    );
    let provider = HttpLicenseProvider::new(base_url);

    Ok(ReportOrchestrator::from_config(
        config,
        Arc::new(store),
        Arc::new(provider),
    ))
}
