//! End-to-end report workflow.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ReportServiceConfig;
use crate::license::LicenseProvider;
use crate::model::{DomainId, ReportRequest, ReportResult, UserRecord};
use crate::observability::metrics;
use crate::report::merge::{build_rows, distinct_emails, index_by_user};
use crate::report::outcome::{ReportError, ReportOutcome};
use crate::resilience::{BreakerError, BreakerPolicy, BreakerState, CircuitBreaker};
use crate::storage::UserBackupQuery;

/// Breaker name used in logs and metrics.
pub const LICENSE_BREAKER: &str = "license_service";

/// Produces backup/license reports for a domain.
///
/// Cheap to clone; clones share the same breaker.
#[derive(Clone)]
pub struct ReportOrchestrator {
    users: Arc<dyn UserBackupQuery>,
    licenses: Arc<dyn LicenseProvider>,
    breaker: Arc<CircuitBreaker>,
    license_timeout: Duration,
}

impl ReportOrchestrator {
    pub fn new(
        users: Arc<dyn UserBackupQuery>,
        licenses: Arc<dyn LicenseProvider>,
        breaker: Arc<CircuitBreaker>,
        license_timeout: Duration,
    ) -> Self {
        Self {
            users,
            licenses,
            breaker,
            license_timeout,
        }
    }

    /// Build an orchestrator with a fresh breaker from `config`.
    pub fn from_config(
        config: &ReportServiceConfig,
        users: Arc<dyn UserBackupQuery>,
        licenses: Arc<dyn LicenseProvider>,
    ) -> Self {
        let breaker = Arc::new(CircuitBreaker::new(
            LICENSE_BREAKER,
            BreakerPolicy::from(&config.breaker),
        ));
        Self::new(
            users,
            licenses,
            breaker,
            Duration::from_millis(config.license.timeout_ms),
        )
    }

    pub fn breaker_state(&self) -> BreakerState {
        self.breaker.state()
    }

    /// Produce a report, mapping every failure to a caller-visible outcome.
    pub async fn get_report(&self, request: ReportRequest) -> ReportOutcome {
        let start = Instant::now();
        let outcome = match self.build_report(request).await {
            Ok(result) => {
                tracing::info!(
                    domain_id = %request.domain_id,
                    total_count = result.total_count,
                    "Report generated"
                );
                ReportOutcome::Success(result)
            }
            Err(error) => {
                log_failure(&request, &error);
                ReportOutcome::from(error)
            }
        };
        metrics::record_report(outcome.label(), start);
        outcome
    }

    async fn build_report(&self, request: ReportRequest) -> Result<ReportResult, ReportError> {
        let domain_id = request.domain_id;
        let users = self
            .users
            .fetch_page(domain_id, request.page_size, request.page_number)
            .await
            .map_err(|source| ReportError::UsersUnavailable { domain_id, source })?;

        if users.is_empty() {
            return Err(ReportError::UsersNotFound(domain_id));
        }

        self.breaker
            .call(|| self.license_report(domain_id, &users))
            .await
            .map_err(|e| match e {
                BreakerError::Open => ReportError::CircuitBroken,
                BreakerError::Inner(inner) => inner,
            })
    }

    /// The breaker-guarded block.
    async fn license_report(
        &self,
        domain_id: DomainId,
        users: &[UserRecord],
    ) -> Result<ReportResult, ReportError> {
        let lease = self
            .licenses
            .acquire(self.license_timeout)
            .ok_or(ReportError::LicenseServiceUnavailable)?;

        let licensed = lease.licensed_user_count(domain_id).await?;
        tracing::info!(domain_id = %domain_id, licensed_users = licensed, "Total licenses for domain");

        let emails = distinct_emails(users);
        let licenses = lease
            .licenses(domain_id, &emails)
            .await?
            .ok_or(ReportError::LicensesMissing(domain_id))?;
        tracing::debug!(
            domain_id = %domain_id,
            users = users.len(),
            licenses = licenses.len(),
            "Merging license records"
        );

        let index = index_by_user(licenses);
        Ok(ReportResult::success(build_rows(users, &index)))
    }
}

fn log_failure(request: &ReportRequest, error: &ReportError) {
    match error {
        ReportError::UsersNotFound(_) => {
            tracing::warn!(domain_id = %request.domain_id, "{}", error)
        }
        ReportError::CircuitBroken => {
            tracing::error!(domain_id = %request.domain_id, "Circuit is broken, license service skipped")
        }
        ReportError::UsersUnavailable { source, .. } => {
            tracing::error!(domain_id = %request.domain_id, error = %source, "User query failed")
        }
        _ => tracing::error!(
            domain_id = %request.domain_id,
            error = %error,
            dependency = error.is_dependency_failure(),
            "Report generation failed"
        ),
    }
}
