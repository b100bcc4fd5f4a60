//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ReportServiceConfig (validated, immutable)
//!     → handed to the orchestrator, breaker and HTTP server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BreakerConfig, LicenseConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ReportServiceConfig, StorageConfig,
};
pub use validation::{validate_config, ValidationError};
