//! Price dispatch: one batched upsert per tenant, no partial credit.

use super::{lookup_credential, CredentialLookup, JobKind, JobReport, TenantOutcome};
use crate::retry::RetryExecutor;
use crate::select::group_by_tenant;
use crate::store::{Credential, PriceRecord, SyncStore};
use crate::transport::MarketTransport;
use shopsync_protocol::PriceUpdate;
use std::time::Instant;

/// Dispatches pending price records as a single batch per tenant.
///
/// Records are marked processed individually, and only after the enclosing
/// batch is acknowledged: a failed batch leaves every record in it
/// unprocessed.
pub fn run<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    workers: usize,
) -> JobReport {
    let start = Instant::now();
    let groups = match store.pending_price() {
        Ok(records) => group_by_tenant(records),
        Err(error) => {
            tracing::error!(error = %error, "price selection failed, aborting job for this cycle");
            return JobReport::new(JobKind::Price, Vec::new(), start.elapsed());
        }
    };

    let entries: Vec<_> = groups.into_iter().collect();
    let outcomes = super::run_bounded(workers, &entries, |(tenant, records)| {
        let credential = match lookup_credential(store, JobKind::Price, tenant) {
            CredentialLookup::Found(c) => c,
            CredentialLookup::Missing => return TenantOutcome::skipped(tenant),
            CredentialLookup::Failed(message) => {
                return TenantOutcome::failed(tenant, message, records.len())
            }
        };
        dispatch_tenant(store, transport, retry, tenant, &credential, records)
    });

    JobReport::new(JobKind::Price, outcomes, start.elapsed())
}

fn to_wire(record: &PriceRecord) -> PriceUpdate {
    PriceUpdate {
        sku_id: record.sku_id.clone(),
        price: record.window.clone(),
    }
}

fn dispatch_tenant<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    tenant: &str,
    credential: &Credential,
    records: &[PriceRecord],
) -> TenantOutcome {
    let prices: Vec<PriceUpdate> = records.iter().map(to_wire).collect();

    match retry.execute(|| transport.create_update_price(credential, &prices)) {
        Ok(()) => {
            let mut sent = 0;
            let mut failed = 0;
            for record in records {
                match store.mark_price_processed(&record.sku_id) {
                    Ok(()) => sent += 1,
                    Err(error) => {
                        tracing::error!(tenant, sku = %record.sku_id, error = %error,
                            "price acknowledged but could not be marked processed");
                        failed += 1;
                    }
                }
            }
            tracing::info!(tenant, count = sent, "price batch posted");
            TenantOutcome::completed(tenant, sent, failed)
        }
        Err(error) => {
            tracing::warn!(tenant, error = %error, "price batch dispatch failed");
            TenantOutcome::failed(tenant, error.to_string(), records.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::memory::MemoryStore;
    use crate::testutil;
    use crate::transport::{MockTransport, RecordedCall};

    fn retry() -> RetryExecutor {
        RetryExecutor::new(RetryConfig::no_retry())
    }

    #[test]
    fn acknowledged_batch_marks_each_record_processed() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_price(testutil::price_record("T1", "S1"));
        store.add_price(testutil::price_record("T1", "S2"));
        let transport = MockTransport::new();

        let report = run(&store, &transport, &retry(), 2);

        assert_eq!(report.sent(), 2);
        assert_eq!(transport.calls().len(), 1);
        assert!(store.pending_price().unwrap().is_empty());
    }

    #[test]
    fn failed_batch_gives_no_partial_credit() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_price(testutil::price_record("T1", "S1"));
        store.add_price(testutil::price_record("T1", "S2"));
        let transport = MockTransport::new();
        transport.fail_tenant("T1");

        let report = run(&store, &transport, &retry(), 2);

        assert_eq!(report.sent(), 0);
        assert_eq!(store.pending_price().unwrap().len(), 2);
    }

    #[test]
    fn tenant_without_credential_leaves_its_records_pending() {
        // The end-to-end scenario: T1 has a credential and succeeds, T2 has
        // none and its record is untouched.
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_price(testutil::price_record("T1", "S1"));
        store.add_price(testutil::price_record("T2", "S9"));
        let transport = MockTransport::new();

        let report = run(&store, &transport, &retry(), 2);

        assert_eq!(report.sent(), 1);
        assert_eq!(report.skipped_tenants(), 1);

        let pending = store.pending_price().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].sku_id, "S9");

        // Only T1's batch went out.
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], RecordedCall::Price { tenant, .. } if tenant == "T1"));
    }

    #[test]
    fn exhausted_tenant_does_not_block_others() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_credential(testutil::credential("T2"));
        store.add_price(testutil::price_record("T1", "S1"));
        store.add_price(testutil::price_record("T2", "S2"));
        let transport = MockTransport::new();
        transport.fail_tenant("T1");

        let report = run(&store, &transport, &retry(), 1);

        assert_eq!(report.sent(), 1);
        let pending = store.pending_price().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].tenant_id, "T1");
    }
}
