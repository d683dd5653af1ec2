//! The five sync jobs and their shared dispatch plumbing.
//!
//! Each job reads the store, groups work by tenant, resolves the tenant's
//! credential, and issues remote calls through the retry executor. Tenant
//! groups run on scoped worker threads bounded by the engine's concurrency
//! limit; one tenant's failure never touches another's.

pub mod catalog;
pub mod ingest;
pub mod lifecycle;
pub mod price;
pub mod stock;

use crate::store::{Credential, SyncStore};
use parking_lot::Mutex;
use std::time::Duration;

/// Identifies one of the five sync jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Catalog dispatch.
    Catalog,
    /// Stock dispatch.
    Stock,
    /// Price dispatch.
    Price,
    /// Order ingestion.
    OrderIngest,
    /// Order lifecycle advancement.
    OrderLifecycle,
}

impl JobKind {
    /// Stable name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Catalog => "catalog",
            JobKind::Stock => "stock",
            JobKind::Price => "price",
            JobKind::OrderIngest => "order-ingest",
            JobKind::OrderLifecycle => "order-lifecycle",
        }
    }
}

/// How one tenant's batch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantStatus {
    /// The batch was dispatched (individual records may still have failed).
    Completed,
    /// The tenant has no credential; the batch was skipped.
    SkippedNoCredential,
    /// The batch failed as a whole (retries exhausted or store error).
    Failed(String),
}

/// Outcome of one tenant's batch within a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantOutcome {
    /// The tenant.
    pub tenant_id: String,
    /// How the batch ended.
    pub status: TenantStatus,
    /// Records acknowledged and marked processed (or orders applied).
    pub sent: usize,
    /// Records that failed and stay pending for the next cycle.
    pub failed: usize,
}

impl TenantOutcome {
    pub(crate) fn completed(tenant: &str, sent: usize, failed: usize) -> Self {
        Self {
            tenant_id: tenant.into(),
            status: TenantStatus::Completed,
            sent,
            failed,
        }
    }

    pub(crate) fn skipped(tenant: &str) -> Self {
        Self {
            tenant_id: tenant.into(),
            status: TenantStatus::SkippedNoCredential,
            sent: 0,
            failed: 0,
        }
    }

    pub(crate) fn failed(tenant: &str, message: String, failed: usize) -> Self {
        Self {
            tenant_id: tenant.into(),
            status: TenantStatus::Failed(message),
            sent: 0,
            failed,
        }
    }
}

/// Report of one job run.
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Which job ran.
    pub job: JobKind,
    /// Per-tenant outcomes (the lifecycle job reports one outcome per
    /// tenant per pass).
    pub tenants: Vec<TenantOutcome>,
    /// Wall time of the run.
    pub duration: Duration,
}

impl JobReport {
    pub(crate) fn new(job: JobKind, tenants: Vec<TenantOutcome>, duration: Duration) -> Self {
        Self {
            job,
            tenants,
            duration,
        }
    }

    /// Total records acknowledged across tenants.
    pub fn sent(&self) -> usize {
        self.tenants.iter().map(|t| t.sent).sum()
    }

    /// Total records that failed across tenants.
    pub fn failed(&self) -> usize {
        self.tenants.iter().map(|t| t.failed).sum()
    }

    /// Tenants skipped for lack of a credential.
    pub fn skipped_tenants(&self) -> usize {
        self.tenants
            .iter()
            .filter(|t| t.status == TenantStatus::SkippedNoCredential)
            .count()
    }
}

/// Result of a credential lookup for one tenant group.
pub(crate) enum CredentialLookup {
    Found(Credential),
    Missing,
    Failed(String),
}

/// Resolves a tenant credential, logging the skip cases.
pub(crate) fn lookup_credential<S: SyncStore + ?Sized>(
    store: &S,
    job: JobKind,
    tenant: &str,
) -> CredentialLookup {
    match store.credential(tenant) {
        Ok(Some(credential)) => CredentialLookup::Found(credential),
        Ok(None) => {
            tracing::warn!(job = job.as_str(), tenant, "no credential, skipping tenant batch");
            CredentialLookup::Missing
        }
        Err(error) => {
            tracing::error!(job = job.as_str(), tenant, error = %error, "credential lookup failed");
            CredentialLookup::Failed(error.to_string())
        }
    }
}

/// Runs `handler` over the items on scoped worker threads, at most
/// `workers` at a time, and joins all of them before returning. Outcomes
/// come back sorted by tenant so reports are deterministic.
pub(crate) fn run_bounded<I: Sync>(
    workers: usize,
    items: &[I],
    handler: impl Fn(&I) -> TenantOutcome + Sync,
) -> Vec<TenantOutcome> {
    let outcomes = Mutex::new(Vec::with_capacity(items.len()));
    for window in items.chunks(workers.max(1)) {
        std::thread::scope(|scope| {
            for item in window {
                let outcomes = &outcomes;
                let handler = &handler;
                scope.spawn(move || {
                    let outcome = handler(item);
                    outcomes.lock().push(outcome);
                });
            }
        });
    }
    let mut collected = outcomes.into_inner();
    collected.sort_by(|a, b| a.tenant_id.cmp(&b.tenant_id));
    collected
}
