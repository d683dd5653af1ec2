//! Shared fixtures for unit tests.

use crate::store::{
    CatalogRecord, Credential, DocumentType, Order, OrderStatus, PriceRecord, ProcessedState,
    StockRecord,
};
use chrono::NaiveDate;
use serde_json::json;
use shopsync_protocol::{CatalogItem, PriceWindow};

pub(crate) fn credential(tenant: &str) -> Credential {
    Credential {
        tenant_id: tenant.into(),
        token: format!("token-{tenant}"),
    }
}

pub(crate) fn window() -> PriceWindow {
    PriceWindow {
        price: 10.0,
        discount_price: 8.0,
        min_quantity: 1,
        discount_min_quantity: 5,
        from_date: NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        to_date: NaiveDate::from_ymd_opt(2026, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap(),
    }
}

pub(crate) fn price_record(tenant: &str, sku: &str) -> PriceRecord {
    PriceRecord {
        tenant_id: tenant.into(),
        sku_id: sku.into(),
        window: window(),
        state: ProcessedState::Pending,
    }
}

pub(crate) fn stock_record(tenant: &str, sku: &str, quantity: i64) -> StockRecord {
    StockRecord {
        tenant_id: tenant.into(),
        sku_id: sku.into(),
        quantity,
        warehouse_id: "WH-1".into(),
        state: ProcessedState::Pending,
    }
}

pub(crate) fn catalog_item(external_id: &str, images: Vec<String>) -> CatalogItem {
    CatalogItem {
        external_id: external_id.into(),
        name: "Kettle".into(),
        description: "Steel kettle".into(),
        tax_code: "VAT20".into(),
        attributes: json!({"color": "silver"}),
        brand: "Acme".into(),
        categories: json!(["kitchen"]),
        images,
        skus: json!([{"sku": format!("{external_id}-1")}]),
    }
}

pub(crate) fn catalog_record(tenant: &str, external_id: &str, images: Vec<String>) -> CatalogRecord {
    CatalogRecord {
        tenant_id: tenant.into(),
        item: catalog_item(external_id, images),
        state: ProcessedState::Pending,
    }
}

pub(crate) fn order(id: i64, order_id: &str, status: OrderStatus, flag: bool) -> Order {
    Order {
        id,
        tenant_id: "T1".into(),
        order_date: "2026-02-01T08:00:00".into(),
        order_id: order_id.into(),
        quantity: 1,
        unit_price: 9.9,
        item_no: "P-1".into(),
        item_description: "Mug".into(),
        posting_description: "Arta K, Tirana, +355".into(),
        status,
        reason: None,
        sticker: None,
        change_flag: flag,
        document_type: DocumentType::Standard,
    }
}
