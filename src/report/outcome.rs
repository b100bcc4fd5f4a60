//! Report failure taxonomy and caller-visible outcomes.

use thiserror::Error;

use crate::license::LicenseError;
use crate::model::{DomainId, ReportResult};
use crate::storage::StorageError;

/// Everything that can stop a report from being produced.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Problem of getting users for {domain_id}")]
    UsersUnavailable {
        domain_id: DomainId,
        #[source]
        source: StorageError,
    },

    #[error("Users for domain '{0}' not found")]
    UsersNotFound(DomainId),

    #[error("License service error")]
    LicenseServiceUnavailable,

    #[error("Problem of getting licenses for {0}")]
    LicensesMissing(DomainId),

    #[error(transparent)]
    License(#[from] LicenseError),

    #[error("Circuit is broken")]
    CircuitBroken,
}

impl ReportError {
    /// True for failures the license breaker counts.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            ReportError::LicenseServiceUnavailable
                | ReportError::LicensesMissing(_)
                | ReportError::License(_)
        )
    }
}

/// The four caller-visible outcomes of a report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Report produced.
    Success(ReportResult),
    /// Request or domain state prevented a report.
    BadRequest(String),
    /// Breaker is open; nothing was attempted.
    ServiceUnavailable,
    /// Unexpected dependency fault.
    InternalError,
}

impl ReportOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            ReportOutcome::Success(_) => "ok",
            ReportOutcome::BadRequest(_) => "bad_request",
            ReportOutcome::ServiceUnavailable => "service_unavailable",
            ReportOutcome::InternalError => "internal_error",
        }
    }
}

impl From<ReportError> for ReportOutcome {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::CircuitBroken => ReportOutcome::ServiceUnavailable,
            ReportError::License(_) => ReportOutcome::InternalError,
            other => ReportOutcome::BadRequest(other.to_string()),
        }
    }
}
