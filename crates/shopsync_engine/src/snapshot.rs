//! File-backed store implementation.
//!
//! Persists the whole working set as one JSON snapshot, loaded at open and
//! rewritten on [`SnapshotStore::save`]. Suitable for the CLI and small
//! deployments; larger installations implement [`SyncStore`] over their own
//! database.

use crate::memory::MemoryStore;
use crate::store::{
    CatalogRecord, Credential, Order, OrderStatus, PriceRecord, StockRecord, StoreError,
    StoreResult, SyncStore,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serializable image of a full store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Provisioned tenant credentials.
    #[serde(default)]
    pub credentials: Vec<Credential>,
    /// Catalog change records.
    #[serde(default)]
    pub catalog: Vec<CatalogRecord>,
    /// Stock change records.
    #[serde(default)]
    pub stock: Vec<StockRecord>,
    /// Price change records.
    #[serde(default)]
    pub price: Vec<PriceRecord>,
    /// Order rows.
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// A [`SyncStore`] persisted as a JSON snapshot file.
pub struct SnapshotStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl SnapshotStore {
    /// Opens the snapshot at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let memory = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
            let snapshot: StoreSnapshot = serde_json::from_str(&raw)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;
            MemoryStore::from_snapshot(snapshot)
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, memory })
    }

    /// Writes the current contents back to the snapshot file.
    pub fn save(&self) -> StoreResult<()> {
        let snapshot = self.memory.snapshot();
        let raw = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.path.display())))
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory working set.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }
}

impl SyncStore for SnapshotStore {
    fn credential(&self, tenant_id: &str) -> StoreResult<Option<Credential>> {
        self.memory.credential(tenant_id)
    }

    fn tenants(&self) -> StoreResult<Vec<String>> {
        self.memory.tenants()
    }

    fn pending_catalog(&self) -> StoreResult<Vec<CatalogRecord>> {
        self.memory.pending_catalog()
    }

    fn pending_stock(&self) -> StoreResult<Vec<StockRecord>> {
        self.memory.pending_stock()
    }

    fn pending_price(&self) -> StoreResult<Vec<PriceRecord>> {
        self.memory.pending_price()
    }

    fn mark_catalog_processed(&self, external_id: &str) -> StoreResult<()> {
        self.memory.mark_catalog_processed(external_id)
    }

    fn mark_stock_processed(&self, sku_id: &str) -> StoreResult<()> {
        self.memory.mark_stock_processed(sku_id)
    }

    fn mark_price_processed(&self, sku_id: &str) -> StoreResult<()> {
        self.memory.mark_price_processed(sku_id)
    }

    fn insert_order_if_absent(&self, order: Order) -> StoreResult<bool> {
        self.memory.insert_order_if_absent(order)
    }

    fn orders_in(&self, status: OrderStatus, change_flag: bool) -> StoreResult<Vec<Order>> {
        self.memory.orders_in(status, change_flag)
    }

    fn orders_awaiting_sticker(&self) -> StoreResult<Vec<Order>> {
        self.memory.orders_awaiting_sticker()
    }

    fn set_order_status(&self, order_id: &str, status: OrderStatus) -> StoreResult<()> {
        self.memory.set_order_status(order_id, status)
    }

    fn set_change_flag(&self, order_id: &str, change_flag: bool) -> StoreResult<()> {
        self.memory.set_change_flag(order_id, change_flag)
    }

    fn set_sticker(&self, order_id: &str, sticker: Vec<u8>) -> StoreResult<()> {
        self.memory.set_sticker(order_id, sticker)
    }
}
