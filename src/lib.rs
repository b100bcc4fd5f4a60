//! Domain backup/license status reporting service.

// Core subsystems
pub mod config;
pub mod http;
pub mod license;
pub mod model;
pub mod report;
pub mod storage;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::ReportServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use report::{ReportOrchestrator, ReportOutcome};
