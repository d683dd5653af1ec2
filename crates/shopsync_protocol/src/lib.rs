//! # Shopsync Protocol
//!
//! Wire types for the marketplace HTTP API.
//!
//! This crate provides:
//! - Catalog, stock and price payloads for the `CreateUpdate*` endpoints
//! - The order listing envelope and response shapes
//! - Route constants and query builders for the GET sync endpoints
//!
//! This is a pure protocol crate with no I/O operations. All types carry
//! `serde` renames matching the service's JSON conventions: camelCase for
//! request payloads, PascalCase for the order listing response.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod orders;
mod price;
mod routes;
mod stock;

pub use catalog::CatalogItem;
pub use orders::{OrderLine, OrderListRequest, OrderListResponse, RemoteOrder};
pub use price::{PriceUpdate, PriceWindow};
pub use routes::{
    cancel_order_path, generate_invoice_path, start_order_handling_path, sticker_report_path,
    CREATE_UPDATE_PRICE, CREATE_UPDATE_PRODUCT, CREATE_UPDATE_STOCK, GET_ORDERS,
};
pub use stock::StockUpdate;

/// Remote status string the service uses for orders pending cancellation.
pub const STATUS_CANCELLATION_REQUESTED: &str = "cancellation-requested";
