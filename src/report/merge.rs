//! Merge of user backup records with license records.

use std::collections::{BTreeSet, HashMap};

use crate::model::{LicenseInfo, LicenseType, UserId, UserRecord, UserStatistics};

/// Distinct emails of a page, in a stable order.
pub fn distinct_emails(users: &[UserRecord]) -> BTreeSet<String> {
    users.iter().map(|u| u.user_email.clone()).collect()
}

/// Index license records by user id. A repeated id keeps the last record.
pub fn index_by_user(licenses: Vec<LicenseInfo>) -> HashMap<UserId, LicenseInfo> {
    licenses.into_iter().map(|l| (l.user_id, l)).collect()
}

/// One report row per user, classified against `licenses`.
pub fn build_rows(users: &[UserRecord], licenses: &HashMap<UserId, LicenseInfo>) -> Vec<UserStatistics> {
    users
        .iter()
        .map(|u| UserStatistics {
            id: u.id,
            user_name: u.user_name.clone(),
            in_backup: u.backup_enabled,
            email_last_backup_status: u.email.last_backup_status.clone(),
            email_last_backup_date: u.email.last_backup_date,
            drive_last_backup_status: u.drive.last_backup_status.clone(),
            drive_last_backup_date: u.drive.last_backup_date,
            calendar_last_backup_status: u.calendar.last_backup_status.clone(),
            calendar_last_backup_date: u.calendar.last_backup_date,
            license_type: LicenseType::of(licenses.get(&u.id)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BackupSnapshot, MembershipState};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn user(id: u128, email: &str) -> UserRecord {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        UserRecord {
            id: Uuid::from_u128(id),
            domain_id: Uuid::from_u128(1),
            user_name: format!("user-{id}"),
            user_email: email.to_string(),
            backup_enabled: true,
            state: MembershipState::InDomain,
            email: BackupSnapshot::new("Ok", date),
            drive: BackupSnapshot::new("Failed", date),
            calendar: BackupSnapshot::default(),
        }
    }

    fn license(id: u128, is_trial: bool) -> LicenseInfo {
        LicenseInfo {
            user_id: Uuid::from_u128(id),
            email: format!("user-{id}@contoso.com"),
            is_trial,
        }
    }

    #[test]
    fn test_license_classification() {
        let users = vec![user(1, "a@x"), user(2, "b@x"), user(3, "c@x")];
        // id 99 belongs to another domain and must not leak into the rows.
        let index = index_by_user(vec![license(1, true), license(2, false), license(99, true)]);

        let rows = build_rows(&users, &index);
        let types: Vec<_> = rows.iter().map(|r| r.license_type).collect();
        assert_eq!(types, vec![LicenseType::Trial, LicenseType::Paid, LicenseType::None]);
    }

    #[test]
    fn test_backup_fields_copied_verbatim() {
        let users = vec![user(1, "a@x")];
        let rows = build_rows(&users, &HashMap::new());
        let row = &rows[0];

        assert_eq!(row.id, users[0].id);
        assert_eq!(row.user_name, "user-1");
        assert!(row.in_backup);
        assert_eq!(row.email_last_backup_status.as_deref(), Some("Ok"));
        assert_eq!(row.email_last_backup_date, users[0].email.last_backup_date);
        assert_eq!(row.drive_last_backup_status.as_deref(), Some("Failed"));
        assert_eq!(row.calendar_last_backup_status, None);
        assert_eq!(row.calendar_last_backup_date, None);
    }

    #[test]
    fn test_duplicate_license_last_wins() {
        let index = index_by_user(vec![license(1, true), license(1, false)]);
        assert_eq!(index.len(), 1);
        assert!(!index[&Uuid::from_u128(1)].is_trial);
    }

    #[test]
    fn test_distinct_emails() {
        let users = vec![user(1, "b@x"), user(2, "a@x"), user(3, "b@x")];
        let emails: Vec<_> = distinct_emails(&users).into_iter().collect();
        assert_eq!(emails, vec!["a@x".to_string(), "b@x".to_string()]);
    }
}
