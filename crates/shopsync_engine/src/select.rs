//! Change-set selection: tenant grouping of pending records.

use crate::store::{CatalogRecord, Order, PriceRecord, StockRecord};
use std::collections::BTreeMap;

/// A record carrying its owning tenant.
pub trait TenantScoped {
    /// The tenant identifier, possibly empty on malformed rows.
    fn tenant_id(&self) -> &str;

    /// A short identifier for log messages.
    fn record_id(&self) -> &str;
}

impl TenantScoped for CatalogRecord {
    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn record_id(&self) -> &str {
        &self.item.external_id
    }
}

impl TenantScoped for StockRecord {
    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn record_id(&self) -> &str {
        &self.sku_id
    }
}

impl TenantScoped for PriceRecord {
    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn record_id(&self) -> &str {
        &self.sku_id
    }
}

impl TenantScoped for Order {
    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn record_id(&self) -> &str {
        &self.order_id
    }
}

/// Groups records by tenant, preserving the store's read order within each
/// group.
///
/// Records without a tenant are malformed: they have no credential path, so
/// they are excluded and logged rather than dispatched.
pub fn group_by_tenant<R: TenantScoped>(records: Vec<R>) -> BTreeMap<String, Vec<R>> {
    let mut groups: BTreeMap<String, Vec<R>> = BTreeMap::new();
    for record in records {
        if record.tenant_id().is_empty() {
            tracing::warn!(
                record = record.record_id(),
                "record has no tenant, excluded from sync"
            );
            continue;
        }
        groups
            .entry(record.tenant_id().to_string())
            .or_default()
            .push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn groups_preserve_read_order() {
        let records = vec![
            testutil::stock_record("T2", "S1", 5),
            testutil::stock_record("T1", "S2", 3),
            testutil::stock_record("T2", "S3", 1),
        ];

        let groups = group_by_tenant(records);
        assert_eq!(groups.len(), 2);
        let t2: Vec<_> = groups["T2"].iter().map(|r| r.sku_id.as_str()).collect();
        assert_eq!(t2, vec!["S1", "S3"]);
    }

    #[test]
    fn tenantless_records_are_excluded() {
        let records = vec![
            testutil::stock_record("", "S1", 5),
            testutil::stock_record("T1", "S2", 3),
        ];

        let groups = group_by_tenant(records);
        assert_eq!(groups.len(), 1);
        assert!(groups.contains_key("T1"));
    }
}
