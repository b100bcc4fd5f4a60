//! Circuit breaker for the license service dependency.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: one trial call tests whether it recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive failures >= failure_threshold
//! Open → Half-Open: break_duration elapsed, next caller becomes the trial
//! Half-Open → Closed: trial succeeds (counter reset)
//! Half-Open → Open: trial fails (cool-down restarts)
//! ```
//!
//! # Design Decisions
//! - Global per dependency, not per caller
//! - Counter update and state transition happen under one lock
//! - Single trial in Half-Open; concurrent callers are rejected as Open
//! - An attempt dropped before completing counts as a failure

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::config::BreakerConfig;
use crate::observability::metrics;

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl BreakerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakerState::Closed => "closed",
            BreakerState::Open => "open",
            BreakerState::HalfOpen => "half_open",
        }
    }

    /// Gauge encoding (0=closed, 1=open, 2=half-open).
    pub fn as_gauge(&self) -> f64 {
        match self {
            BreakerState::Closed => 0.0,
            BreakerState::Open => 1.0,
            BreakerState::HalfOpen => 2.0,
        }
    }
}

/// Fixed breaker policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerPolicy {
    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,
    /// How long the circuit stays open before a trial is allowed.
    pub break_duration: Duration,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 2,
            break_duration: Duration::from_secs(10),
        }
    }
}

impl From<&BreakerConfig> for BreakerPolicy {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold.max(1),
            break_duration: Duration::from_secs(config.break_duration_secs),
        }
    }
}

/// Error returned by [`CircuitBreaker::call`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// Circuit is open; the operation was not invoked.
    #[error("circuit is broken")]
    Open,

    /// Operation ran and failed.
    #[error("{0}")]
    Inner(E),
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Consecutive-failure circuit breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: &'static str,
    policy: BreakerPolicy,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, policy: BreakerPolicy) -> Self {
        metrics::record_breaker_state(name, BreakerState::Closed);
        Self {
            name,
            policy,
            inner: Mutex::new(BreakerInner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    /// Current state as a caller would observe it: an Open circuit whose
    /// break duration has elapsed reports Half-Open.
    pub fn state(&self) -> BreakerState {
        let inner = self.lock();
        match inner.state {
            BreakerState::Open if self.cool_down_elapsed(&inner) => BreakerState::HalfOpen,
            state => state,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// Run `operation` through the breaker.
    ///
    /// Returns [`BreakerError::Open`] without invoking `operation` when the
    /// circuit is open or a Half-Open trial is already in flight.
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempt = self.admit().ok_or(BreakerError::Open)?;

        match operation().await {
            Ok(value) => {
                attempt.succeed();
                Ok(value)
            }
            Err(e) => {
                attempt.fail();
                Err(BreakerError::Inner(e))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        // State stays consistent across a poisoning panic: every transition
        // is a handful of field stores.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cool_down_elapsed(&self, inner: &BreakerInner) -> bool {
        inner
            .opened_at
            .map(|at| at.elapsed() >= self.policy.break_duration)
            .unwrap_or(true)
    }

    fn admit(&self) -> Option<Attempt<'_>> {
        let mut inner = self.lock();
        let trial = match inner.state {
            BreakerState::Closed => false,
            BreakerState::Open => {
                if !self.cool_down_elapsed(&inner) {
                    return None;
                }
                self.transition(&mut inner, BreakerState::HalfOpen);
                inner.trial_in_flight = true;
                true
            }
            BreakerState::HalfOpen => {
                if inner.trial_in_flight {
                    return None;
                }
                inner.trial_in_flight = true;
                true
            }
        };
        Some(Attempt {
            breaker: self,
            trial,
            settled: false,
        })
    }

    fn record_success(&self, trial: bool) {
        let mut inner = self.lock();
        if trial {
            inner.trial_in_flight = false;
            inner.consecutive_failures = 0;
            inner.opened_at = None;
            self.transition(&mut inner, BreakerState::Closed);
        } else if inner.state == BreakerState::Closed {
            inner.consecutive_failures = 0;
        }
    }

    fn record_failure(&self, trial: bool) {
        let mut inner = self.lock();
        if trial {
            inner.trial_in_flight = false;
            inner.opened_at = Some(Instant::now());
            self.transition(&mut inner, BreakerState::Open);
        } else if inner.state == BreakerState::Closed {
            inner.consecutive_failures += 1;
            if inner.consecutive_failures >= self.policy.failure_threshold {
                inner.opened_at = Some(Instant::now());
                self.transition(&mut inner, BreakerState::Open);
            }
        }
        // Closed-state attempts finishing after the circuit opened are not
        // counted again.
    }

    fn transition(&self, inner: &mut BreakerInner, to: BreakerState) {
        if inner.state == to {
            return;
        }
        let from = inner.state;
        inner.state = to;

        match to {
            BreakerState::Open => tracing::warn!(
                breaker = self.name,
                from = from.as_str(),
                failures = inner.consecutive_failures,
                break_secs = self.policy.break_duration.as_secs(),
                "Circuit breaker opened"
            ),
            BreakerState::HalfOpen => tracing::info!(
                breaker = self.name,
                "Circuit breaker half-open, admitting trial call"
            ),
            BreakerState::Closed => tracing::info!(
                breaker = self.name,
                "Circuit breaker closed"
            ),
        }
        metrics::record_breaker_transition(self.name, to);
    }
}

/// An admitted call. Settles exactly once; dropping it unsettled counts as
/// a failure so a cancelled trial never holds the Half-Open slot.
struct Attempt<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl Attempt<'_> {
    fn succeed(mut self) {
        self.settled = true;
        self.breaker.record_success(self.trial);
    }

    fn fail(mut self) {
        self.settled = true;
        self.breaker.record_failure(self.trial);
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.record_failure(self.trial);
        }
    }
}
