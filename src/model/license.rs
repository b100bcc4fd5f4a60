//! License records returned by the license service.

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// License record for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInfo {
    pub user_id: UserId,
    pub email: String,
    pub is_trial: bool,
}

/// License classification shown in a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseType {
    Trial,
    Paid,
    None,
}

impl LicenseType {
    /// Classify an optional license record.
    pub fn of(license: Option<&LicenseInfo>) -> Self {
        match license {
            Some(info) if info.is_trial => LicenseType::Trial,
            Some(_) => LicenseType::Paid,
            None => LicenseType::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Trial => "Trial",
            LicenseType::Paid => "Paid",
            LicenseType::None => "None",
        }
    }
}

impl std::fmt::Display for LicenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
