//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON or pretty)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Logging and metrics are side effects; they never change a report outcome
//! - Request ID flows through every log line of a request span
//! - Metric updates are cheap enough for the hot path

pub mod logging;
pub mod metrics;
