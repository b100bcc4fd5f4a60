//! HTTP client for the remote license service.
//!
//! # Endpoints
//! - `GET  {base}/domains/{domain}/licensed-users/count` → `{"count": n}`
//! - `POST {base}/domains/{domain}/licenses` with `{"emails": [...]}` → `[LicenseInfo]` or `null`

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{LicenseError, LicenseLease, LicenseProvider, LicenseService};
use crate::model::{DomainId, LicenseInfo};

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Serialize)]
struct LicensesRequest<'a> {
    emails: &'a BTreeSet<String>,
}

/// Provider that leases reqwest-backed license clients.
#[derive(Debug, Clone)]
pub struct HttpLicenseProvider {
    base_url: Url,
    active_leases: Arc<AtomicUsize>,
}

impl HttpLicenseProvider {
    pub fn new(mut base_url: Url) -> Self {
        // Url::join drops the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            active_leases: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of leases handed out and not yet released.
    pub fn active_leases(&self) -> usize {
        self.active_leases.load(Ordering::Relaxed)
    }
}

impl LicenseProvider for HttpLicenseProvider {
    fn acquire(&self, timeout: Duration) -> Option<LicenseLease> {
        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build license service client");
                return None;
            }
        };

        self.active_leases.fetch_add(1, Ordering::Relaxed);
        let service = HttpLicenseClient {
            client,
            base_url: self.base_url.clone(),
            active_leases: self.active_leases.clone(),
        };
        Some(LicenseLease::new(Box::new(service), timeout))
    }
}

struct HttpLicenseClient {
    client: reqwest::Client,
    base_url: Url,
    active_leases: Arc<AtomicUsize>,
}

impl HttpLicenseClient {
    fn endpoint(&self, path: &str) -> Result<Url, LicenseError> {
        self.base_url
            .join(path)
            .map_err(|e| LicenseError::Transport(format!("invalid endpoint '{}': {}", path, e)))
    }
}

fn transport_err(e: reqwest::Error) -> LicenseError {
    match e.status() {
        Some(status) => LicenseError::Status(status.as_u16()),
        None if e.is_decode() => LicenseError::Decode(e.to_string()),
        None => LicenseError::Transport(e.to_string()),
    }
}

#[async_trait]
impl LicenseService for HttpLicenseClient {
    async fn licensed_user_count(&self, domain_id: DomainId) -> Result<u64, LicenseError> {
        let url = self.endpoint(&format!("domains/{}/licensed-users/count", domain_id))?;
        let body: CountResponse = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_err)?
            .json()
            .await
            .map_err(transport_err)?;
        Ok(body.count)
    }

    async fn licenses(
        &self,
        domain_id: DomainId,
        emails: &BTreeSet<String>,
    ) -> Result<Option<Vec<LicenseInfo>>, LicenseError> {
        let url = self.endpoint(&format!("domains/{}/licenses", domain_id))?;
        self.client
            .post(url)
            .json(&LicensesRequest { emails })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_err)?
            .json::<Option<Vec<LicenseInfo>>>()
            .await
            .map_err(transport_err)
    }

    fn release(&self) {
        self.active_leases.fetch_sub(1, Ordering::Relaxed);
    }
}
