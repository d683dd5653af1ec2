//! Stock line payload for `/CreateUpdateStock`.

use serde::{Deserialize, Serialize};

/// One stock level for a SKU in a warehouse.
///
/// The service takes the whole tenant batch as a single array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    /// SKU identifier.
    pub sku_id: String,
    /// Available quantity.
    pub quantity: i64,
    /// Remote warehouse the quantity belongs to.
    pub warehouse_id: String,
    /// Owning tenant.
    pub tenant_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let update = StockUpdate {
            sku_id: "S-9".into(),
            quantity: 14,
            warehouse_id: "WH-2".into(),
            tenant_id: "T1".into(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["skuId"], "S-9");
        assert_eq!(value["warehouseId"], "WH-2");
        assert_eq!(value["tenantId"], "T1");
        assert_eq!(value["quantity"], 14);
    }
}
