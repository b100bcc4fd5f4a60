//! Domain model shared by every subsystem.
//!
//! # Data Flow
//! ```text
//! storage (UserRecord + BackupSnapshot ×3)
//!     ┐
//!     ├─→ report::merge → UserStatistics → ReportResult
//!     ┘
//! license gateway (LicenseInfo)
//! ```
//!
//! # Design Decisions
//! - Records are request-scoped values, never cached between calls
//! - Report rows are derived only; nothing here is persisted back
//! - Wire format is camelCase to match the admin dashboard contract

pub mod license;
pub mod report;
pub mod user;

pub use license::{LicenseInfo, LicenseType};
pub use report::{ReportRequest, ReportResult, UserStatistics};
pub use user::{BackupSnapshot, DomainId, MembershipState, UserId, UserRecord};
