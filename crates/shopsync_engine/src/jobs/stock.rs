//! Stock dispatch: one batched upsert per tenant.

use super::{lookup_credential, CredentialLookup, JobKind, JobReport, TenantOutcome};
use crate::retry::RetryExecutor;
use crate::select::group_by_tenant;
use crate::store::{Credential, StockRecord, SyncStore};
use crate::transport::MarketTransport;
use shopsync_protocol::StockUpdate;
use std::time::Instant;

/// Dispatches pending stock records as a single batch per tenant.
///
/// On acknowledgment every record in the batch is marked processed; on
/// failure the whole batch stays pending for the next cycle.
pub fn run<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    workers: usize,
) -> JobReport {
    let start = Instant::now();
    let groups = match store.pending_stock() {
        Ok(records) => group_by_tenant(records),
        Err(error) => {
            tracing::error!(error = %error, "stock selection failed, aborting job for this cycle");
            return JobReport::new(JobKind::Stock, Vec::new(), start.elapsed());
        }
    };

    let entries: Vec<_> = groups.into_iter().collect();
    let outcomes = super::run_bounded(workers, &entries, |(tenant, records)| {
        let credential = match lookup_credential(store, JobKind::Stock, tenant) {
            CredentialLookup::Found(c) => c,
            CredentialLookup::Missing => return TenantOutcome::skipped(tenant),
            CredentialLookup::Failed(message) => {
                return TenantOutcome::failed(tenant, message, records.len())
            }
        };
        dispatch_tenant(store, transport, retry, tenant, &credential, records)
    });

    JobReport::new(JobKind::Stock, outcomes, start.elapsed())
}

fn to_wire(record: &StockRecord) -> StockUpdate {
    StockUpdate {
        sku_id: record.sku_id.clone(),
        quantity: record.quantity,
        warehouse_id: record.warehouse_id.clone(),
        tenant_id: record.tenant_id.clone(),
    }
}

fn dispatch_tenant<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    tenant: &str,
    credential: &Credential,
    records: &[StockRecord],
) -> TenantOutcome {
    let lines: Vec<StockUpdate> = records.iter().map(to_wire).collect();

    match retry.execute(|| transport.create_update_stock(credential, &lines)) {
        Ok(()) => {
            let mut sent = 0;
            let mut failed = 0;
            for record in records {
                match store.mark_stock_processed(&record.sku_id) {
                    Ok(()) => sent += 1,
                    Err(error) => {
                        tracing::error!(tenant, sku = %record.sku_id, error = %error,
                            "stock acknowledged but could not be marked processed");
                        failed += 1;
                    }
                }
            }
            tracing::info!(tenant, count = sent, "stock batch posted");
            TenantOutcome::completed(tenant, sent, failed)
        }
        Err(error) => {
            tracing::warn!(tenant, error = %error, "stock batch dispatch failed");
            TenantOutcome::failed(tenant, error.to_string(), records.len())
        }
    }
}
