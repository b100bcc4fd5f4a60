//! In-process user store.
//!
//! Backs the service when no external database is wired in, and doubles as
//! the store for tests. Availability can be switched off to model an
//! unreachable database.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{page_window, StorageError, UserBackupQuery};
use crate::model::{DomainId, MembershipState, UserId, UserRecord};

fn poison_err<T>(_: PoisonError<T>) -> StorageError {
    StorageError::Query("lock poisoned".to_string())
}

/// Thread-safe in-memory user table.
#[derive(Debug)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
    available: AtomicBool,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryUserStore {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users: RwLock::new(users),
            available: AtomicBool::new(true),
        }
    }

    /// Load a JSON array of user records.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let users: Vec<UserRecord> = serde_json::from_reader(reader)?;
        tracing::info!(path = ?path, users = users.len(), "Loaded user seed file");
        Ok(Self::new(users))
    }

    /// Insert or replace a user.
    pub fn insert(&self, user: UserRecord) -> Result<(), StorageError> {
        let mut users = self.users.write().map_err(poison_err)?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        Ok(())
    }

    /// Mark a user as removed from their domain. Backup flags stay untouched.
    pub fn remove_from_domain(&self, id: &UserId) -> Result<bool, StorageError> {
        let mut users = self.users.write().map_err(poison_err)?;
        Ok(match users.iter_mut().find(|u| u.id == *id) {
            Some(user) => {
                user.state = MembershipState::NotInDomain;
                true
            }
            None => false,
        })
    }

    /// Drop every record.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.users.write().map_err(poison_err)?.clear();
        Ok(())
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserBackupQuery for InMemoryUserStore {
    async fn fetch_page(
        &self,
        domain_id: DomainId,
        page_size: i32,
        page_number: i32,
    ) -> Result<Vec<UserRecord>, StorageError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable);
        }

        let users = self.users.read().map_err(poison_err)?;
        let mut matching: Vec<UserRecord> = users
            .iter()
            .filter(|u| u.is_reportable_in(&domain_id))
            .cloned()
            .collect();
        drop(users);

        matching.sort_by_key(|u| u.id);

        Ok(match page_window(page_size, page_number) {
            Some((skip, take)) => matching.into_iter().skip(skip).take(take).collect(),
            None => matching,
        })
    }
}
