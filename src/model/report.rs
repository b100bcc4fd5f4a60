//! Report request and response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::license::LicenseType;
use super::user::{DomainId, UserId};

/// A report request for one domain.
///
/// `page_size` and `page_number` only paginate when both are strictly
/// positive; 0 (the default) or a negative value means "everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub domain_id: DomainId,
    pub page_size: i32,
    pub page_number: i32,
}

impl ReportRequest {
    /// Request the whole domain, unpaginated.
    pub fn unpaged(domain_id: DomainId) -> Self {
        Self {
            domain_id,
            page_size: 0,
            page_number: 0,
        }
    }

    pub fn paged(domain_id: DomainId, page_size: i32, page_number: i32) -> Self {
        Self {
            domain_id,
            page_size,
            page_number,
        }
    }
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub id: UserId,
    pub user_name: String,
    pub in_backup: bool,
    pub email_last_backup_status: Option<String>,
    pub email_last_backup_date: Option<DateTime<Utc>>,
    pub drive_last_backup_status: Option<String>,
    pub drive_last_backup_date: Option<DateTime<Utc>>,
    pub calendar_last_backup_status: Option<String>,
    pub calendar_last_backup_date: Option<DateTime<Utc>>,
    pub license_type: LicenseType,
}

/// Report payload.
///
/// Either `succeeded` with `data`, or failed with `error`; constructors keep
/// the two from being populated together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub succeeded: bool,
    pub total_count: usize,
    pub data: Vec<UserStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportResult {
    pub fn success(data: Vec<UserStatistics>) -> Self {
        Self {
            succeeded: true,
            total_count: data.len(),
            data,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            total_count: 0,
            data: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_carries_error_only() {
        let result = ReportResult::failure("Users for domain 'x' not found");
        assert!(!result.succeeded);
        assert_eq!(result.total_count, 0);
        assert!(result.data.is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["succeeded"], false);
        assert_eq!(json["error"], "Users for domain 'x' not found");
    }

    #[test]
    fn test_success_omits_error() {
        let json = serde_json::to_value(ReportResult::success(Vec::new())).unwrap();
        assert_eq!(json["succeeded"], true);
        assert!(json.get("error").is_none());
    }
}
