//! In-memory store implementation.

use crate::snapshot::StoreSnapshot;
use crate::store::{
    CatalogRecord, Credential, Order, OrderStatus, PriceRecord, ProcessedState, StockRecord,
    StoreResult, SyncStore,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A store backed by process memory.
///
/// Used directly in tests and as the working set of
/// [`crate::SnapshotStore`]. All mutations take the write lock, so the
/// check-then-insert of order ingestion is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    credentials: BTreeMap<String, Credential>,
    catalog: Vec<CatalogRecord>,
    stock: Vec<StockRecord>,
    price: Vec<PriceRecord>,
    orders: BTreeMap<i64, Order>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a store from a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        {
            let mut state = store.inner.write();
            for credential in snapshot.credentials {
                state
                    .credentials
                    .insert(credential.tenant_id.clone(), credential);
            }
            state.catalog = snapshot.catalog;
            state.stock = snapshot.stock;
            state.price = snapshot.price;
            for order in snapshot.orders {
                state.orders.insert(order.id, order);
            }
        }
        store
    }

    /// Captures the full store contents.
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.inner.read();
        StoreSnapshot {
            credentials: state.credentials.values().cloned().collect(),
            catalog: state.catalog.clone(),
            stock: state.stock.clone(),
            price: state.price.clone(),
            orders: state.orders.values().cloned().collect(),
        }
    }

    /// Provisions a credential.
    pub fn add_credential(&self, credential: Credential) {
        let mut state = self.inner.write();
        state
            .credentials
            .insert(credential.tenant_id.clone(), credential);
    }

    /// Adds a catalog record.
    pub fn add_catalog(&self, record: CatalogRecord) {
        self.inner.write().catalog.push(record);
    }

    /// Adds a stock record.
    pub fn add_stock(&self, record: StockRecord) {
        self.inner.write().stock.push(record);
    }

    /// Adds a price record.
    pub fn add_price(&self, record: PriceRecord) {
        self.inner.write().price.push(record);
    }

    /// Inserts or replaces an order row.
    pub fn put_order(&self, order: Order) {
        self.inner.write().orders.insert(order.id, order);
    }

    /// Reads one order by remote id.
    pub fn order(&self, id: i64) -> Option<Order> {
        self.inner.read().orders.get(&id).cloned()
    }

    /// Number of stored orders.
    pub fn order_count(&self) -> usize {
        self.inner.read().orders.len()
    }
}

impl SyncStore for MemoryStore {
    fn credential(&self, tenant_id: &str) -> StoreResult<Option<Credential>> {
        Ok(self.inner.read().credentials.get(tenant_id).cloned())
    }

    fn tenants(&self) -> StoreResult<Vec<String>> {
        Ok(self.inner.read().credentials.keys().cloned().collect())
    }

    fn pending_catalog(&self) -> StoreResult<Vec<CatalogRecord>> {
        Ok(self
            .inner
            .read()
            .catalog
            .iter()
            .filter(|r| r.state.is_pending())
            .cloned()
            .collect())
    }

    fn pending_stock(&self) -> StoreResult<Vec<StockRecord>> {
        Ok(self
            .inner
            .read()
            .stock
            .iter()
            .filter(|r| r.state.is_pending())
            .cloned()
            .collect())
    }

    fn pending_price(&self) -> StoreResult<Vec<PriceRecord>> {
        Ok(self
            .inner
            .read()
            .price
            .iter()
            .filter(|r| r.state.is_pending())
            .cloned()
            .collect())
    }

    fn mark_catalog_processed(&self, external_id: &str) -> StoreResult<()> {
        let mut state = self.inner.write();
        for record in state
            .catalog
            .iter_mut()
            .filter(|r| r.item.external_id == external_id)
        {
            record.state = ProcessedState::Processed;
        }
        Ok(())
    }

    fn mark_stock_processed(&self, sku_id: &str) -> StoreResult<()> {
        let mut state = self.inner.write();
        for record in state.stock.iter_mut().filter(|r| r.sku_id == sku_id) {
            record.state = ProcessedState::Processed;
        }
        Ok(())
    }

    fn mark_price_processed(&self, sku_id: &str) -> StoreResult<()> {
        let mut state = self.inner.write();
        for record in state.price.iter_mut().filter(|r| r.sku_id == sku_id) {
            record.state = ProcessedState::Processed;
        }
        Ok(())
    }

    fn insert_order_if_absent(&self, order: Order) -> StoreResult<bool> {
        let mut state = self.inner.write();
        if state.orders.contains_key(&order.id) {
            return Ok(false);
        }
        state.orders.insert(order.id, order);
        Ok(true)
    }

    fn orders_in(&self, status: OrderStatus, change_flag: bool) -> StoreResult<Vec<Order>> {
        Ok(self
            .inner
            .read()
            .orders
            .values()
            .filter(|o| o.status == status && o.change_flag == change_flag)
            .cloned()
            .collect())
    }

    fn orders_awaiting_sticker(&self) -> StoreResult<Vec<Order>> {
        Ok(self
            .inner
            .read()
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Ready && o.sticker_missing())
            .cloned()
            .collect())
    }

    fn set_order_status(&self, order_id: &str, status: OrderStatus) -> StoreResult<()> {
        let mut state = self.inner.write();
        for order in state.orders.values_mut().filter(|o| o.order_id == order_id) {
            order.status = status;
        }
        Ok(())
    }

    fn set_change_flag(&self, order_id: &str, change_flag: bool) -> StoreResult<()> {
        let mut state = self.inner.write();
        for order in state.orders.values_mut().filter(|o| o.order_id == order_id) {
            order.change_flag = change_flag;
        }
        Ok(())
    }

    fn set_sticker(&self, order_id: &str, sticker: Vec<u8>) -> StoreResult<()> {
        let mut state = self.inner.write();
        for order in state.orders.values_mut().filter(|o| o.order_id == order_id) {
            order.sticker = Some(sticker.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{order, price_record};

    #[test]
    fn duplicate_order_is_not_reinserted() {
        let store = MemoryStore::new();
        let first = order(1, "ORD-1", OrderStatus::Accepted, false);

        assert!(store.insert_order_if_absent(first.clone()).unwrap());
        assert!(!store.insert_order_if_absent(first).unwrap());
        assert_eq!(store.order_count(), 1);
    }

    #[test]
    fn processed_price_is_never_selected_again() {
        let store = MemoryStore::new();
        store.add_price(price_record("T1", "S1"));

        assert_eq!(store.pending_price().unwrap().len(), 1);
        store.mark_price_processed("S1").unwrap();
        assert!(store.pending_price().unwrap().is_empty());

        // Re-running the selection stays empty; nothing resets the flag.
        assert!(store.pending_price().unwrap().is_empty());
    }

    #[test]
    fn orders_in_filters_status_and_flag() {
        let store = MemoryStore::new();
        store.put_order(order(1, "ORD-1", OrderStatus::Accepted, true));
        store.put_order(order(2, "ORD-2", OrderStatus::Accepted, false));
        store.put_order(order(3, "ORD-3", OrderStatus::Ready, true));

        let accepted = store.orders_in(OrderStatus::Accepted, true).unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].order_id, "ORD-1");
    }

    #[test]
    fn sticker_selection_and_update() {
        let store = MemoryStore::new();
        store.put_order(order(1, "ORD-1", OrderStatus::Ready, false));
        store.put_order(order(2, "ORD-2", OrderStatus::Accepted, false));

        let waiting = store.orders_awaiting_sticker().unwrap();
        assert_eq!(waiting.len(), 1);

        store.set_sticker("ORD-1", vec![0x50, 0x4b]).unwrap();
        assert!(store.orders_awaiting_sticker().unwrap().is_empty());
        assert_eq!(store.order(1).unwrap().sticker, Some(vec![0x50, 0x4b]));
    }

    #[test]
    fn status_update_is_keyed_by_business_order_number() {
        let store = MemoryStore::new();
        store.put_order(order(1, "ORD-1", OrderStatus::Ready, true));

        store.set_order_status("ORD-1", OrderStatus::Done).unwrap();
        assert_eq!(store.order(1).unwrap().status, OrderStatus::Done);
    }
}
