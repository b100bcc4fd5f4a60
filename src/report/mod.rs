//! Report generation subsystem.
//!
//! # Data Flow
//! ```text
//! get_report(request)
//!     → storage: fetch page            (failures → bad request, breaker untouched)
//!     → breaker-guarded block:
//!           acquire license lease
//!           → licensed user count      (logged only)
//!           → licenses for page emails
//!           → merge.rs (rows keyed by user id)
//!     → outcome.rs (one of ok / bad request / unavailable / internal error)
//! ```
//!
//! # Design Decisions
//! - The breaker guards the whole license sequence as one failure-counting unit
//! - Empty or unreachable storage is reported before the breaker is consulted,
//!   so a storage outage never opens the license circuit
//! - Every error maps to exactly one caller-visible outcome

pub mod merge;
pub mod orchestrator;
pub mod outcome;

pub use orchestrator::ReportOrchestrator;
pub use outcome::{ReportError, ReportOutcome};
