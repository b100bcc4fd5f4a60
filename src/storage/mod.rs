//! User/backup storage subsystem.
//!
//! # Data Flow
//! ```text
//! ReportOrchestrator
//!     → UserBackupQuery::fetch_page(domain, page_size, page_number)
//!     → filter (domain, backup enabled, in-domain) → order by id → paginate
//!     → Ok(records) | Err(StorageError)
//! ```
//!
//! # Design Decisions
//! - "No users" is `Ok(vec![])`; "store unreachable" is an error, never an empty page
//! - Pagination only when both page parameters are strictly positive
//! - Ordering by id keeps pages stable across calls

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{DomainId, UserRecord};

pub use memory::InMemoryUserStore;

/// Errors surfaced by a user store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backing store could not be reached.
    #[error("user store unavailable")]
    Unavailable,

    /// Store answered but the query failed.
    #[error("user query failed: {0}")]
    Query(String),
}

/// Paged read of backup-enabled, in-domain users.
#[async_trait]
pub trait UserBackupQuery: Send + Sync {
    async fn fetch_page(
        &self,
        domain_id: DomainId,
        page_size: i32,
        page_number: i32,
    ) -> Result<Vec<UserRecord>, StorageError>;
}

/// Skip/take window for a page request, or `None` for the unpaged set.
pub fn page_window(page_size: i32, page_number: i32) -> Option<(usize, usize)> {
    if page_size > 0 && page_number > 0 {
        let size = page_size as usize;
        let skip = size.saturating_mul(page_number as usize - 1);
        Some((skip, size))
    } else {
        None
    }
}
