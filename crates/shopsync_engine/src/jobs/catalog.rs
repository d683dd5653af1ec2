//! Catalog dispatch: per-record product upserts.

use super::{lookup_credential, CredentialLookup, JobKind, JobReport, TenantOutcome};
use crate::retry::RetryExecutor;
use crate::select::group_by_tenant;
use crate::store::{CatalogRecord, Credential, SyncStore};
use crate::transport::MarketTransport;
use std::time::Instant;

/// Dispatches pending catalog records, one remote call per record.
///
/// Only records whose item carries at least one media reference are
/// eligible; the rest stay `Pending` and are re-attempted next cycle once
/// media arrives. Acknowledged records are marked processed.
pub fn run<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    workers: usize,
) -> JobReport {
    let start = Instant::now();
    let groups = match store.pending_catalog() {
        Ok(records) => group_by_tenant(records),
        Err(error) => {
            tracing::error!(error = %error, "catalog selection failed, aborting job for this cycle");
            return JobReport::new(JobKind::Catalog, Vec::new(), start.elapsed());
        }
    };

    let entries: Vec<_> = groups.into_iter().collect();
    let outcomes = super::run_bounded(workers, &entries, |(tenant, records)| {
        let credential = match lookup_credential(store, JobKind::Catalog, tenant) {
            CredentialLookup::Found(c) => c,
            CredentialLookup::Missing => return TenantOutcome::skipped(tenant),
            CredentialLookup::Failed(message) => {
                return TenantOutcome::failed(tenant, message, records.len())
            }
        };
        dispatch_tenant(store, transport, retry, tenant, &credential, records)
    });

    JobReport::new(JobKind::Catalog, outcomes, start.elapsed())
}

fn dispatch_tenant<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    tenant: &str,
    credential: &Credential,
    records: &[CatalogRecord],
) -> TenantOutcome {
    let eligible: Vec<&CatalogRecord> = records.iter().filter(|r| r.item.has_media()).collect();
    if eligible.is_empty() {
        tracing::debug!(tenant, "no catalog items with media this cycle");
        return TenantOutcome::completed(tenant, 0, 0);
    }

    let mut sent = 0;
    let mut failed = 0;
    for record in eligible {
        let result = retry.execute(|| {
            transport.create_update_products(credential, std::slice::from_ref(&record.item))
        });
        match result {
            Ok(()) => match store.mark_catalog_processed(&record.item.external_id) {
                Ok(()) => {
                    tracing::info!(tenant, item = %record.item.external_id, "catalog item posted");
                    sent += 1;
                }
                Err(error) => {
                    tracing::error!(tenant, item = %record.item.external_id, error = %error,
                        "item acknowledged but could not be marked processed");
                    failed += 1;
                }
            },
            Err(error) => {
                tracing::warn!(tenant, item = %record.item.external_id, error = %error,
                    "catalog item dispatch failed");
                failed += 1;
            }
        }
    }
    TenantOutcome::completed(tenant, sent, failed)
}
