//! License service gateway.
//!
//! # Data Flow
//! ```text
//! ReportOrchestrator
//!     → LicenseProvider::acquire(timeout) → Option<LicenseLease>
//!     → lease.licensed_user_count(domain)      (bounded by timeout)
//!     → lease.licenses(domain, emails)         (bounded by timeout)
//!     → lease dropped → LicenseService::release
//! ```
//!
//! # Design Decisions
//! - A lease is scoped to one report request and released on every exit path
//! - Timeouts are enforced at the lease, so every implementation gets them
//! - Failures are opaque to callers; the breaker treats them all alike

pub mod http;

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{DomainId, LicenseInfo};

pub use http::HttpLicenseProvider;

/// Errors from a license service call.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Call did not finish within the lease timeout.
    #[error("license service timeout after {0} ms")]
    Timeout(u64),

    /// Network or connection failure.
    #[error("license service transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error("license service returned status {0}")]
    Status(u16),

    /// Response body could not be decoded.
    #[error("license service response decode error: {0}")]
    Decode(String),

    /// Any other remote fault.
    #[error("license service fault: {0}")]
    Remote(String),
}

/// Remote license operations behind a lease.
#[async_trait]
pub trait LicenseService: Send + Sync {
    /// Number of licensed users in a domain.
    async fn licensed_user_count(&self, domain_id: DomainId) -> Result<u64, LicenseError>;

    /// License records for the given emails. `Ok(None)` means the service
    /// answered without a record set.
    async fn licenses(
        &self,
        domain_id: DomainId,
        emails: &BTreeSet<String>,
    ) -> Result<Option<Vec<LicenseInfo>>, LicenseError>;

    /// Called exactly once when the owning lease is dropped.
    fn release(&self) {}
}

/// Hands out per-request license leases.
pub trait LicenseProvider: Send + Sync {
    /// Acquire a lease whose calls are bounded by `timeout`. `None` when no
    /// usable handle can be produced.
    fn acquire(&self, timeout: Duration) -> Option<LicenseLease>;
}

/// A RAII lease on a license service handle.
pub struct LicenseLease {
    service: Box<dyn LicenseService>,
    timeout: Duration,
}

impl LicenseLease {
    pub fn new(service: Box<dyn LicenseService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub async fn licensed_user_count(&self, domain_id: DomainId) -> Result<u64, LicenseError> {
        self.bounded(self.service.licensed_user_count(domain_id)).await
    }

    pub async fn licenses(
        &self,
        domain_id: DomainId,
        emails: &BTreeSet<String>,
    ) -> Result<Option<Vec<LicenseInfo>>, LicenseError> {
        self.bounded(self.service.licenses(domain_id, emails)).await
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, LicenseError>
    where
        F: Future<Output = Result<T, LicenseError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(LicenseError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}

impl std::fmt::Debug for LicenseLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseLease")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Drop for LicenseLease {
    fn drop(&mut self) {
        self.service.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    struct SlowService {
        released: Arc<AtomicUsize>,
        delay: Duration,
    }

    #[async_trait]
    impl LicenseService for SlowService {
        async fn licensed_user_count(&self, _domain_id: DomainId) -> Result<u64, LicenseError> {
            tokio::time::sleep(self.delay).await;
            Ok(7)
        }

        async fn licenses(
            &self,
            _domain_id: DomainId,
            _emails: &BTreeSet<String>,
        ) -> Result<Option<Vec<LicenseInfo>>, LicenseError> {
            Err(LicenseError::Remote("boom".into()))
        }

        fn release(&self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn lease(delay: Duration, timeout: Duration) -> (LicenseLease, Arc<AtomicUsize>) {
        let released = Arc::new(AtomicUsize::new(0));
        let service = SlowService {
            released: released.clone(),
            delay,
        };
        (LicenseLease::new(Box::new(service), timeout), released)
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_within_timeout() {
        let (lease, _) = lease(Duration::from_millis(10), Duration::from_millis(100));
        assert_eq!(lease.licensed_user_count(Uuid::nil()).await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_past_timeout_fails() {
        let (lease, _) = lease(Duration::from_secs(5), Duration::from_millis(100));
        let err = lease.licensed_user_count(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, LicenseError::Timeout(100)));
    }

    #[tokio::test]
    async fn test_release_on_drop_after_error() {
        let (lease, released) = lease(Duration::ZERO, Duration::from_secs(1));
        let result = lease.licenses(Uuid::nil(), &BTreeSet::new()).await;
        assert!(result.is_err());
        assert_eq!(released.load(Ordering::SeqCst), 0);

        drop(lease);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
