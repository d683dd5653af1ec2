//! Persistent store contract and the domain records flowing through it.
//!
//! The engine does not own a storage schema. It consumes a narrow
//! [`SyncStore`] trait: filtered-by-flag reads per entity kind, point
//! updates to flag/status/sticker fields, and an atomic insert-if-absent
//! keyed by the remote order id. [`crate::MemoryStore`] backs tests;
//! [`crate::SnapshotStore`] is the file-backed twin used by the CLI.

use serde::{Deserialize, Serialize};
use shopsync_protocol::{CatalogItem, PriceWindow};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store cannot be reached. Aborts the current job for this cycle;
    /// the next scheduled cycle starts from scratch.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A referenced record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Persisted data failed to parse.
    #[error("corrupt store data: {0}")]
    Corrupt(String),
}

/// A bearer credential scoped to one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The tenant this credential belongs to.
    pub tenant_id: String,
    /// The pre-provisioned bearer token.
    pub token: String,
}

/// Whether an outbound record still awaits remote acknowledgment.
///
/// The flag is one-way: once a record is `Processed` the engine never
/// resets it to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessedState {
    /// Not yet acknowledged by the remote service; selected every cycle.
    Pending,
    /// Acknowledged; never selected again.
    Processed,
}

impl ProcessedState {
    /// Returns true if the record still needs propagation.
    pub fn is_pending(&self) -> bool {
        matches!(self, ProcessedState::Pending)
    }
}

/// A pending catalog change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Owning tenant.
    pub tenant_id: String,
    /// The item payload as the marketplace expects it.
    pub item: CatalogItem,
    /// Propagation state.
    pub state: ProcessedState,
}

/// A pending stock change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Owning tenant.
    pub tenant_id: String,
    /// SKU identifier.
    pub sku_id: String,
    /// Available quantity.
    pub quantity: i64,
    /// Remote warehouse identifier.
    pub warehouse_id: String,
    /// Propagation state.
    pub state: ProcessedState,
}

/// A pending price change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Owning tenant.
    pub tenant_id: String,
    /// SKU identifier.
    pub sku_id: String,
    /// Regular/discount prices and validity window.
    pub window: PriceWindow,
    /// Propagation state.
    pub state: ProcessedState,
}

/// Local lifecycle status of an order.
///
/// Transitions are monotonic: `Accepted → Ready → Done`, with the parallel
/// terminal path `Cancelled → Done`. The engine never moves an order back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted locally, remote handling not yet started.
    Accepted,
    /// Picked and packed, awaiting invoicing.
    Ready,
    /// Cancellation requested with a reason.
    Cancelled,
    /// Terminal.
    Done,
}

/// Document kind derived from the remote order status at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    /// Regular sales order.
    Standard,
    /// The marketplace asked for this order to be cancelled.
    CancellationRequest,
}

/// A locally stored marketplace order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Remote-assigned unique id; the ingestion deduplication key.
    pub id: i64,
    /// Owning tenant.
    pub tenant_id: String,
    /// Creation timestamp as received from the service.
    pub order_date: String,
    /// Business order number used on all lifecycle calls.
    pub order_id: String,
    /// Quantity of the first order line.
    pub quantity: i64,
    /// Unit price of the first order line.
    pub unit_price: f64,
    /// Product number of the first order line.
    pub item_no: String,
    /// Product description of the first order line.
    pub item_description: String,
    /// Recipient name, city and phone, comma-joined.
    pub posting_description: String,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Cancellation reason, when the upstream system set one.
    pub reason: Option<String>,
    /// Shipping sticker payload, opaque bytes.
    pub sticker: Option<Vec<u8>>,
    /// Gates lifecycle advancement; set by the upstream system.
    pub change_flag: bool,
    /// Document kind derived at ingestion.
    pub document_type: DocumentType,
}

impl Order {
    /// Returns true if no sticker payload is stored yet.
    pub fn sticker_missing(&self) -> bool {
        self.sticker.as_ref().map_or(true, |s| s.is_empty())
    }
}

/// The persistent store the engine synchronizes against.
///
/// All reads are tenant-partitioned by the records' own `tenant_id`.
/// Implementations must uphold the one-way flag invariant: `mark_*` calls
/// move records to `Processed` and nothing in this interface moves them
/// back. `insert_order_if_absent` must be atomic so concurrent ingestion
/// runs cannot duplicate an order.
pub trait SyncStore: Send + Sync {
    /// Resolves the credential of a tenant. `Ok(None)` means the tenant is
    /// not provisioned; callers skip the tenant, they do not fail.
    fn credential(&self, tenant_id: &str) -> StoreResult<Option<Credential>>;

    /// Lists all provisioned tenants.
    fn tenants(&self) -> StoreResult<Vec<String>>;

    /// Catalog records awaiting propagation, in natural store order.
    fn pending_catalog(&self) -> StoreResult<Vec<CatalogRecord>>;

    /// Stock records awaiting propagation.
    fn pending_stock(&self) -> StoreResult<Vec<StockRecord>>;

    /// Price records awaiting propagation.
    fn pending_price(&self) -> StoreResult<Vec<PriceRecord>>;

    /// Marks one catalog record processed, keyed by external id.
    fn mark_catalog_processed(&self, external_id: &str) -> StoreResult<()>;

    /// Marks one stock record processed, keyed by SKU.
    fn mark_stock_processed(&self, sku_id: &str) -> StoreResult<()>;

    /// Marks one price record processed, keyed by SKU.
    fn mark_price_processed(&self, sku_id: &str) -> StoreResult<()>;

    /// Inserts an order unless one with the same remote id exists.
    /// Returns true if the order was inserted.
    fn insert_order_if_absent(&self, order: Order) -> StoreResult<bool>;

    /// Orders with the given status and change flag.
    fn orders_in(&self, status: OrderStatus, change_flag: bool) -> StoreResult<Vec<Order>>;

    /// Ready orders with no sticker payload yet.
    fn orders_awaiting_sticker(&self) -> StoreResult<Vec<Order>>;

    /// Updates the status of every row carrying this business order number.
    fn set_order_status(&self, order_id: &str, status: OrderStatus) -> StoreResult<()>;

    /// Updates the change flag of every row carrying this business order number.
    fn set_change_flag(&self, order_id: &str, change_flag: bool) -> StoreResult<()>;

    /// Stores the sticker payload for this business order number.
    fn set_sticker(&self, order_id: &str, sticker: Vec<u8>) -> StoreResult<()>;
}
