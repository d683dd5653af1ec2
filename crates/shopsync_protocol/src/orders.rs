//! Order listing request envelope and response shapes for `/GetOrders`.

use serde::{Deserialize, Serialize};

/// The fixed pagination/sort envelope the listing endpoint takes.
///
/// The engine always requests a single page of up to 1000 orders, newest
/// first, across all statuses, with line details included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListRequest {
    /// Echo marker returned verbatim by the service.
    pub echo: String,
    /// Free-text search, unused.
    pub search: String,
    /// Page size.
    pub display_length: u32,
    /// Page offset.
    pub display_start: u32,
    /// Sort column index.
    pub sort_col: u32,
    /// Sort direction.
    pub sort_dir: String,
    /// Number of sorting columns.
    pub sorting_cols: u32,
    /// Column selector, unused.
    #[serde(rename = "sColumns")]
    pub s_columns: String,
    /// Status filter; empty means all statuses.
    pub status: String,
    /// Whether order lines are included in the response.
    pub include_details: bool,
}

impl OrderListRequest {
    /// The envelope used for every sync cycle: one page of 1000, descending,
    /// all statuses, details on.
    pub fn full_page() -> Self {
        Self {
            echo: "get_all_orders".into(),
            search: String::new(),
            display_length: 1000,
            display_start: 0,
            sort_col: 0,
            sort_dir: "desc".into(),
            sorting_cols: 1,
            s_columns: String::new(),
            status: String::new(),
            include_details: true,
        }
    }
}

/// Response wrapper of the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderListResponse {
    /// The page of orders.
    #[serde(rename = "Data", default)]
    pub data: Vec<RemoteOrder>,
}

/// One order as returned by the service (PascalCase on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteOrder {
    /// Remote-assigned unique id, the local deduplication key.
    pub id: i64,
    /// Creation timestamp, passed through verbatim.
    pub create_date: String,
    /// Business order number.
    pub order_id: String,
    /// Order lines; the engine summarizes the first one.
    #[serde(default)]
    pub order_details: Vec<OrderLine>,
    /// Recipient name.
    pub recipient_name: String,
    /// Recipient city.
    pub recipient_city: String,
    /// Recipient phone.
    pub recipient_phone: String,
    /// Remote status string.
    pub status: String,
}

/// One line of a remote order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderLine {
    /// Ordered quantity.
    pub quantity: i64,
    /// Unit price.
    pub unit_price: f64,
    /// Product number.
    pub product_no: String,
    /// Product description.
    pub product_description: String,
}
