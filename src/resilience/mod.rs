//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Report request:
//!     → circuit_breaker.rs (admit: Closed passes, Open rejects, HalfOpen admits one trial)
//!     → guarded license workflow (bounded by the lease timeout)
//!     → circuit_breaker.rs (record success/failure, transition state)
//! ```
//!
//! # Design Decisions
//! - One breaker per dependency, shared across all requests via Arc
//! - Fail fast in Open state; the guarded operation is never invoked
//! - No retries; a failed request is reported, not replayed

pub mod circuit_breaker;

pub use circuit_breaker::{BreakerError, BreakerPolicy, BreakerState, CircuitBreaker};
