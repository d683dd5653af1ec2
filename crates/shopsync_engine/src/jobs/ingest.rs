//! Order ingestion: pull remote orders per tenant, insert deduplicated.

use super::{lookup_credential, CredentialLookup, JobKind, JobReport, TenantOutcome};
use crate::error::{SyncError, SyncResult};
use crate::retry::RetryExecutor;
use crate::store::{Credential, DocumentType, Order, OrderStatus, SyncStore};
use crate::transport::MarketTransport;
use shopsync_protocol::{OrderListRequest, RemoteOrder, STATUS_CANCELLATION_REQUESTED};
use std::time::Instant;

/// Pulls each tenant's orders and inserts the ones not seen before.
///
/// One listing call per tenant (single page, newest first, all statuses).
/// The insert is keyed by the remote order id; an order already present is
/// never re-inserted. New rows carry `change_flag = false` so the lifecycle
/// machine ignores them until the upstream system flags them.
pub fn run<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    workers: usize,
    page_size: u32,
) -> JobReport {
    let start = Instant::now();
    let tenants = match store.tenants() {
        Ok(tenants) => tenants,
        Err(error) => {
            tracing::error!(error = %error, "tenant listing failed, aborting ingestion for this cycle");
            return JobReport::new(JobKind::OrderIngest, Vec::new(), start.elapsed());
        }
    };

    let outcomes = super::run_bounded(workers, &tenants, |tenant| {
        let credential = match lookup_credential(store, JobKind::OrderIngest, tenant) {
            CredentialLookup::Found(c) => c,
            CredentialLookup::Missing => return TenantOutcome::skipped(tenant),
            CredentialLookup::Failed(message) => return TenantOutcome::failed(tenant, message, 0),
        };
        ingest_tenant(store, transport, retry, tenant, &credential, page_size)
    });

    JobReport::new(JobKind::OrderIngest, outcomes, start.elapsed())
}

/// Maps a remote order into a local row.
///
/// The first order line becomes the line summary; an order without lines is
/// malformed. Recipient name, city and phone are concatenated into the
/// posting description, and a requested cancellation becomes the
/// cancellation-request document type.
pub fn map_remote_order(tenant: &str, remote: &RemoteOrder) -> SyncResult<Order> {
    let line = remote
        .order_details
        .first()
        .ok_or_else(|| SyncError::MalformedRecord {
            id: remote.id.to_string(),
            reason: "order has no line details".into(),
        })?;

    let document_type = if remote.status == STATUS_CANCELLATION_REQUESTED {
        DocumentType::CancellationRequest
    } else {
        DocumentType::Standard
    };

    Ok(Order {
        id: remote.id,
        tenant_id: tenant.into(),
        order_date: remote.create_date.clone(),
        order_id: remote.order_id.clone(),
        quantity: line.quantity,
        unit_price: line.unit_price,
        item_no: line.product_no.clone(),
        item_description: line.product_description.clone(),
        posting_description: format!(
            "{}, {}, {}",
            remote.recipient_name, remote.recipient_city, remote.recipient_phone
        ),
        status: OrderStatus::Accepted,
        reason: None,
        sticker: None,
        change_flag: false,
        document_type,
    })
}

fn ingest_tenant<S: SyncStore, T: MarketTransport>(
    store: &S,
    transport: &T,
    retry: &RetryExecutor,
    tenant: &str,
    credential: &Credential,
    page_size: u32,
) -> TenantOutcome {
    let request = OrderListRequest {
        display_length: page_size,
        ..OrderListRequest::full_page()
    };

    let response = match retry.execute(|| transport.get_orders(credential, &request)) {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(tenant, error = %error, "order listing failed");
            return TenantOutcome::failed(tenant, error.to_string(), 0);
        }
    };

    if response.data.is_empty() {
        tracing::debug!(tenant, "no remote orders");
        return TenantOutcome::completed(tenant, 0, 0);
    }

    let mut inserted = 0;
    let mut failed = 0;
    for remote in &response.data {
        let order = match map_remote_order(tenant, remote) {
            Ok(order) => order,
            Err(error) => {
                tracing::warn!(tenant, remote_id = remote.id, error = %error,
                    "skipping malformed remote order");
                failed += 1;
                continue;
            }
        };
        match store.insert_order_if_absent(order) {
            Ok(true) => {
                tracing::info!(tenant, remote_id = remote.id, order = %remote.order_id,
                    "order ingested");
                inserted += 1;
            }
            Ok(false) => {
                tracing::debug!(tenant, remote_id = remote.id, "order already present, skipped");
            }
            Err(error) => {
                tracing::error!(tenant, remote_id = remote.id, error = %error,
                    "order insert failed");
                failed += 1;
            }
        }
    }
    TenantOutcome::completed(tenant, inserted, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::memory::MemoryStore;
    use crate::testutil;
    use crate::transport::MockTransport;
    use shopsync_protocol::{OrderLine, OrderListResponse};

    fn retry() -> RetryExecutor {
        RetryExecutor::new(RetryConfig::no_retry())
    }

    fn remote_order(id: i64, order_id: &str, status: &str) -> RemoteOrder {
        RemoteOrder {
            id,
            create_date: "2026-02-10T09:30:00".into(),
            order_id: order_id.into(),
            order_details: vec![OrderLine {
                quantity: 2,
                unit_price: 19.9,
                product_no: "P-1".into(),
                product_description: "Mug".into(),
            }],
            recipient_name: "Arta K".into(),
            recipient_city: "Tirana".into(),
            recipient_phone: "+355-68-000".into(),
            status: status.into(),
        }
    }

    fn listing(orders: Vec<RemoteOrder>) -> OrderListResponse {
        OrderListResponse { data: orders }
    }

    #[test]
    fn ingesting_the_same_order_twice_yields_one_row() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        let transport = MockTransport::new();
        transport.set_orders("T1", listing(vec![remote_order(501, "ORD-77", "accepted")]));

        let first = run(&store, &transport, &retry(), 1, 1000);
        let second = run(&store, &transport, &retry(), 1, 1000);

        assert_eq!(first.sent(), 1);
        assert_eq!(second.sent(), 0);
        assert_eq!(store.order_count(), 1);
    }

    #[test]
    fn mapped_fields() {
        let order = map_remote_order("T1", &remote_order(501, "ORD-77", "accepted")).unwrap();
        assert_eq!(order.id, 501);
        assert_eq!(order.posting_description, "Arta K, Tirana, +355-68-000");
        assert_eq!(order.document_type, DocumentType::Standard);
        assert!(!order.change_flag);
        assert_eq!(order.status, OrderStatus::Accepted);
    }

    #[test]
    fn cancellation_request_maps_to_document_type() {
        let order =
            map_remote_order("T1", &remote_order(502, "ORD-78", STATUS_CANCELLATION_REQUESTED))
                .unwrap();
        assert_eq!(order.document_type, DocumentType::CancellationRequest);
    }

    #[test]
    fn order_without_lines_is_skipped_as_malformed() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        let mut bad = remote_order(503, "ORD-79", "accepted");
        bad.order_details.clear();
        let transport = MockTransport::new();
        transport.set_orders("T1", listing(vec![bad, remote_order(504, "ORD-80", "accepted")]));

        let report = run(&store, &transport, &retry(), 1, 1000);

        assert_eq!(report.sent(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(store.order_count(), 1);
    }

    #[test]
    fn listing_failure_for_one_tenant_does_not_block_another() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_credential(testutil::credential("T2"));
        let transport = MockTransport::new();
        transport.fail_tenant("T1");
        transport.set_orders("T2", listing(vec![remote_order(505, "ORD-81", "accepted")]));

        let report = run(&store, &transport, &retry(), 1, 1000);

        assert_eq!(report.sent(), 1);
        assert_eq!(store.order_count(), 1);
        assert_eq!(store.order(505).unwrap().tenant_id, "T2");
    }
}
