//! Users and their per-subsystem backup state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque domain identifier.
pub type DomainId = Uuid;

/// Opaque user identifier.
pub type UserId = Uuid;

/// Whether a provisioned user still belongs to their domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MembershipState {
    #[default]
    InDomain,
    NotInDomain,
}

/// Last backup outcome of one subsystem (email, drive or calendar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub last_backup_status: Option<String>,
    pub last_backup_date: Option<DateTime<Utc>>,
}

impl BackupSnapshot {
    pub fn new(status: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            last_backup_status: Some(status.into()),
            last_backup_date: Some(date),
        }
    }
}

/// A domain user as stored, with the three snapshots it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub domain_id: DomainId,
    pub user_name: String,
    pub user_email: String,
    pub backup_enabled: bool,
    #[serde(default)]
    pub state: MembershipState,
    #[serde(default)]
    pub email: BackupSnapshot,
    #[serde(default)]
    pub drive: BackupSnapshot,
    #[serde(default)]
    pub calendar: BackupSnapshot,
}

impl UserRecord {
    /// True when the record passes the report filter for `domain_id`.
    pub fn is_reportable_in(&self, domain_id: &DomainId) -> bool {
        self.domain_id == *domain_id
            && self.backup_enabled
            && self.state == MembershipState::InDomain
    }
}
