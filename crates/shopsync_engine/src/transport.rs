//! Transport layer abstraction for marketplace calls.

use crate::error::{SyncError, SyncResult};
use crate::store::Credential;
use parking_lot::Mutex;
use shopsync_protocol::{CatalogItem, OrderListRequest, OrderListResponse, PriceUpdate, StockUpdate};
use std::collections::{HashMap, HashSet};

/// Remote calls the sync jobs issue, one method per endpoint.
///
/// Every method takes the resolved tenant credential explicitly; nothing is
/// captured from loop state, so implementations are safe to call from
/// concurrent tenant workers.
pub trait MarketTransport: Send + Sync {
    /// Upserts catalog items (the engine sends one item per call).
    fn create_update_products(
        &self,
        credential: &Credential,
        items: &[CatalogItem],
    ) -> SyncResult<()>;

    /// Upserts a tenant's stock batch.
    fn create_update_stock(
        &self,
        credential: &Credential,
        lines: &[StockUpdate],
    ) -> SyncResult<()>;

    /// Upserts a tenant's price batch.
    fn create_update_price(
        &self,
        credential: &Credential,
        prices: &[PriceUpdate],
    ) -> SyncResult<()>;

    /// Lists a tenant's orders.
    fn get_orders(
        &self,
        credential: &Credential,
        request: &OrderListRequest,
    ) -> SyncResult<OrderListResponse>;

    /// Signals that handling of an accepted order has started.
    fn start_order_handling(&self, credential: &Credential, order_id: &str) -> SyncResult<()>;

    /// Generates the invoice for a ready order.
    fn generate_invoice(&self, credential: &Credential, order_id: &str) -> SyncResult<()>;

    /// Requests cancellation of an order. The lifecycle machine calls this
    /// twice per cancellation; the second call is the confirmation.
    fn cancel_order(
        &self,
        credential: &Credential,
        order_id: &str,
        reason: &str,
    ) -> SyncResult<()>;

    /// Fetches the shipping sticker payload, opaque bytes.
    fn sticker_report(&self, credential: &Credential, order_id: &str) -> SyncResult<Vec<u8>>;
}

/// One call observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// Catalog upsert with the item count sent.
    Products {
        /// Tenant the call was made for.
        tenant: String,
        /// External ids of the items sent.
        external_ids: Vec<String>,
    },
    /// Stock batch upsert.
    Stock {
        /// Tenant the call was made for.
        tenant: String,
        /// SKUs in the batch.
        skus: Vec<String>,
    },
    /// Price batch upsert.
    Price {
        /// Tenant the call was made for.
        tenant: String,
        /// SKUs in the batch.
        skus: Vec<String>,
    },
    /// Order listing.
    Orders {
        /// Tenant the call was made for.
        tenant: String,
    },
    /// Start-handling signal.
    StartHandling {
        /// Tenant the call was made for.
        tenant: String,
        /// Business order number.
        order_id: String,
    },
    /// Invoice generation.
    Invoice {
        /// Tenant the call was made for.
        tenant: String,
        /// Business order number.
        order_id: String,
    },
    /// Cancellation request or confirmation.
    Cancel {
        /// Tenant the call was made for.
        tenant: String,
        /// Business order number.
        order_id: String,
        /// Cancellation reason as sent.
        reason: String,
    },
    /// Sticker fetch.
    Sticker {
        /// Tenant the call was made for.
        tenant: String,
        /// Business order number.
        order_id: String,
    },
}

/// A transport for testing: records every call and returns scripted
/// responses. Tenants listed via [`MockTransport::fail_tenant`] get a
/// retryable transport error on every call.
#[derive(Debug, Default)]
pub struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    failing: Mutex<HashSet<String>>,
    orders: Mutex<HashMap<String, OrderListResponse>>,
    sticker: Mutex<Vec<u8>>,
}

impl MockTransport {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call for this tenant fail with a retryable error.
    pub fn fail_tenant(&self, tenant: impl Into<String>) {
        self.failing.lock().insert(tenant.into());
    }

    /// Scripts the order listing response for a tenant.
    pub fn set_orders(&self, tenant: impl Into<String>, response: OrderListResponse) {
        self.orders.lock().insert(tenant.into(), response);
    }

    /// Scripts the sticker payload.
    pub fn set_sticker_payload(&self, payload: Vec<u8>) {
        *self.sticker.lock() = payload;
    }

    /// Everything observed so far, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of cancel calls recorded for one order.
    pub fn cancel_calls(&self, order_id: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Cancel { order_id: id, .. } if id == order_id))
            .count()
    }

    fn check(&self, credential: &Credential) -> SyncResult<()> {
        if self.failing.lock().contains(&credential.tenant_id) {
            return Err(SyncError::transport_retryable(format!(
                "scripted failure for tenant {}",
                credential.tenant_id
            )));
        }
        Ok(())
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().push(call);
    }
}

impl MarketTransport for MockTransport {
    fn create_update_products(
        &self,
        credential: &Credential,
        items: &[CatalogItem],
    ) -> SyncResult<()> {
        self.record(RecordedCall::Products {
            tenant: credential.tenant_id.clone(),
            external_ids: items.iter().map(|i| i.external_id.clone()).collect(),
        });
        self.check(credential)
    }

    fn create_update_stock(
        &self,
        credential: &Credential,
        lines: &[StockUpdate],
    ) -> SyncResult<()> {
        self.record(RecordedCall::Stock {
            tenant: credential.tenant_id.clone(),
            skus: lines.iter().map(|l| l.sku_id.clone()).collect(),
        });
        self.check(credential)
    }

    fn create_update_price(
        &self,
        credential: &Credential,
        prices: &[PriceUpdate],
    ) -> SyncResult<()> {
        self.record(RecordedCall::Price {
            tenant: credential.tenant_id.clone(),
            skus: prices.iter().map(|p| p.sku_id.clone()).collect(),
        });
        self.check(credential)
    }

    fn get_orders(
        &self,
        credential: &Credential,
        _request: &OrderListRequest,
    ) -> SyncResult<OrderListResponse> {
        self.record(RecordedCall::Orders {
            tenant: credential.tenant_id.clone(),
        });
        self.check(credential)?;
        Ok(self
            .orders
            .lock()
            .get(&credential.tenant_id)
            .cloned()
            .unwrap_or(OrderListResponse { data: Vec::new() }))
    }

    fn start_order_handling(&self, credential: &Credential, order_id: &str) -> SyncResult<()> {
        self.record(RecordedCall::StartHandling {
            tenant: credential.tenant_id.clone(),
            order_id: order_id.into(),
        });
        self.check(credential)
    }

    fn generate_invoice(&self, credential: &Credential, order_id: &str) -> SyncResult<()> {
        self.record(RecordedCall::Invoice {
            tenant: credential.tenant_id.clone(),
            order_id: order_id.into(),
        });
        self.check(credential)
    }

    fn cancel_order(
        &self,
        credential: &Credential,
        order_id: &str,
        reason: &str,
    ) -> SyncResult<()> {
        self.record(RecordedCall::Cancel {
            tenant: credential.tenant_id.clone(),
            order_id: order_id.into(),
            reason: reason.into(),
        });
        self.check(credential)
    }

    fn sticker_report(&self, credential: &Credential, order_id: &str) -> SyncResult<Vec<u8>> {
        self.record(RecordedCall::Sticker {
            tenant: credential.tenant_id.clone(),
            order_id: order_id.into(),
        });
        self.check(credential)?;
        Ok(self.sticker.lock().clone())
    }
}
