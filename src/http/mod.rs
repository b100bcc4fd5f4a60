//! HTTP boundary.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (request ID assigned, span opened)
//!     → server.rs (route, extract domain + page query)
//!     → ReportOrchestrator::get_report
//!     → response.rs (outcome → 200 / 400 / 503 / 500)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ReportQuery};
