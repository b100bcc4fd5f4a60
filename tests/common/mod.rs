//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use backup_report::license::{LicenseError, LicenseLease, LicenseProvider, LicenseService};
use backup_report::model::{BackupSnapshot, DomainId, LicenseInfo, MembershipState, UserRecord};
use backup_report::resilience::{BreakerPolicy, CircuitBreaker};
use backup_report::storage::InMemoryUserStore;
use backup_report::ReportOrchestrator;

pub fn domain_d() -> DomainId {
    Uuid::parse_str("0b48f0de-fc95-4b0d-b0df-08614ca3f6a8").unwrap()
}

pub fn domain_other() -> DomainId {
    Uuid::parse_str("6f7afd03-2442-44fa-9a43-4d34edd681d9").unwrap()
}

pub fn bill_id() -> Uuid {
    Uuid::parse_str("a70227a7-eade-4179-8a90-b43f9b5ac756").unwrap()
}

pub fn jack_id() -> Uuid {
    Uuid::parse_str("9b3c584d-8bad-453c-aa07-8ef5213ec042").unwrap()
}

pub fn sam_id() -> Uuid {
    Uuid::parse_str("1e76f64f-d945-4c4f-bda5-5b95af15842d").unwrap()
}

pub fn ann_id() -> Uuid {
    Uuid::parse_str("02272a80-a99b-4c99-a57a-e0a4ccd38f32").unwrap()
}

fn user(id: Uuid, domain: DomainId, name: &str, email: &str, state: MembershipState) -> UserRecord {
    let date = Utc.with_ymd_and_hms(2024, 5, 17, 3, 30, 0).unwrap();
    UserRecord {
        id,
        domain_id: domain,
        user_name: name.to_string(),
        user_email: email.to_string(),
        backup_enabled: true,
        state,
        email: BackupSnapshot::new("Ok", date),
        drive: BackupSnapshot::new("Ok", date),
        calendar: BackupSnapshot::new("Warning", date),
    }
}

/// Domain D: Bill and Jack in-domain, Ann removed. Sam lives in another domain.
pub fn seeded_store() -> InMemoryUserStore {
    InMemoryUserStore::new(vec![
        user(bill_id(), domain_d(), "Bill Morgan", "bill.morgan@contoso.com", MembershipState::InDomain),
        user(jack_id(), domain_d(), "Jack Hill", "jack.hill@contoso.com", MembershipState::InDomain),
        user(sam_id(), domain_other(), "Sam Smith", "sam.smith@contoso.com", MembershipState::InDomain),
        user(ann_id(), domain_d(), "Ann Mill", "ann.mill@contoso.com", MembershipState::NotInDomain),
    ])
}

pub fn default_licenses() -> Vec<LicenseInfo> {
    vec![
        LicenseInfo {
            user_id: bill_id(),
            email: "bill.morgan@contoso.com".into(),
            is_trial: true,
        },
        LicenseInfo {
            user_id: jack_id(),
            email: "jack.hill@contoso.com".into(),
            is_trial: false,
        },
    ]
}

/// How the scripted license service answers the detail call.
#[derive(Debug, Clone)]
pub enum LicenseBehavior {
    Records(Vec<LicenseInfo>),
    Null,
    Fail,
    Hang,
}

/// Scripted license service with call accounting.
#[derive(Debug)]
pub struct ScriptedLicenses {
    pub count: u64,
    pub behavior: Mutex<LicenseBehavior>,
    pub count_fails: AtomicBool,
    pub acquirable: AtomicBool,
    pub acquisitions: AtomicUsize,
    pub releases: AtomicUsize,
    pub count_calls: AtomicUsize,
    pub license_calls: AtomicUsize,
    pub last_emails: Mutex<Option<BTreeSet<String>>>,
}

impl ScriptedLicenses {
    pub fn new(behavior: LicenseBehavior) -> Arc<Self> {
        Arc::new(Self {
            count: 2,
            behavior: Mutex::new(behavior),
            count_fails: AtomicBool::new(false),
            acquirable: AtomicBool::new(true),
            acquisitions: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            count_calls: AtomicUsize::new(0),
            license_calls: AtomicUsize::new(0),
            last_emails: Mutex::new(None),
        })
    }

    pub fn set_behavior(&self, behavior: LicenseBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// Calls that reached the service (either operation).
    pub fn gateway_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst) + self.license_calls.load(Ordering::SeqCst)
    }
}

struct ScriptedService(Arc<ScriptedLicenses>);

#[async_trait]
impl LicenseService for ScriptedService {
    async fn licensed_user_count(&self, _domain_id: DomainId) -> Result<u64, LicenseError> {
        self.0.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.0.count_fails.load(Ordering::SeqCst) {
            return Err(LicenseError::Remote("count unavailable".into()));
        }
        Ok(self.0.count)
    }

    async fn licenses(
        &self,
        _domain_id: DomainId,
        emails: &BTreeSet<String>,
    ) -> Result<Option<Vec<LicenseInfo>>, LicenseError> {
        self.0.license_calls.fetch_add(1, Ordering::SeqCst);
        *self.0.last_emails.lock().unwrap() = Some(emails.clone());
        let behavior = self.0.behavior.lock().unwrap().clone();
        match behavior {
            LicenseBehavior::Records(records) => Ok(Some(records)),
            LicenseBehavior::Null => Ok(None),
            LicenseBehavior::Fail => Err(LicenseError::Remote("license lookup failed".into())),
            LicenseBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    fn release(&self) {
        self.0.releases.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct ScriptedProvider(pub Arc<ScriptedLicenses>);

impl LicenseProvider for ScriptedProvider {
    fn acquire(&self, timeout: Duration) -> Option<LicenseLease> {
        if !self.0.acquirable.load(Ordering::SeqCst) {
            return None;
        }
        self.0.acquisitions.fetch_add(1, Ordering::SeqCst);
        Some(LicenseLease::new(Box::new(ScriptedService(self.0.clone())), timeout))
    }
}

/// Orchestrator over `store` and `licenses` with the default 2-failure / 10s policy.
pub fn orchestrator(
    store: Arc<InMemoryUserStore>,
    licenses: Arc<ScriptedLicenses>,
) -> (ReportOrchestrator, Arc<CircuitBreaker>) {
    let breaker = Arc::new(CircuitBreaker::new("license_service", BreakerPolicy::default()));
    let orchestrator = ReportOrchestrator::new(
        store,
        Arc::new(ScriptedProvider(licenses)),
        breaker.clone(),
        Duration::from_millis(5000),
    );
    (orchestrator, breaker)
}
