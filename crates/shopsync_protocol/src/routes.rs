//! Route constants and query builders.
//!
//! Paths are relative to the service base URL. The POST endpoints take JSON
//! bodies; the GET endpoints carry their arguments in the query string.

/// Catalog upsert endpoint (array body, one item per request).
pub const CREATE_UPDATE_PRODUCT: &str = "/CreateUpdateProduct";
/// Stock upsert endpoint (array body, whole tenant batch).
pub const CREATE_UPDATE_STOCK: &str = "/CreateUpdateStock";
/// Price upsert endpoint (array body, whole tenant batch).
pub const CREATE_UPDATE_PRICE: &str = "/CreateUpdatePrice";
/// Order listing endpoint.
pub const GET_ORDERS: &str = "/GetOrders";

/// Path for acknowledging an accepted order.
pub fn start_order_handling_path(order_id: &str) -> String {
    format!("/Sync/StartOrderHandling?orderId={order_id}")
}

/// Path for invoicing a ready order.
pub fn generate_invoice_path(order_id: &str) -> String {
    format!("/Sync/GenerateInvoice?orderId={order_id}")
}

/// Path for cancelling an order. The reason travels form-encoded, with
/// spaces as `+`, matching what the service parses.
pub fn cancel_order_path(order_id: &str, reason: &str) -> String {
    format!(
        "/Sync/CancelOrder?orderId={order_id}&reason={}",
        reason.replace(' ', "+")
    )
}

/// Path for fetching the shipping sticker of an order.
pub fn sticker_report_path(order_id: &str) -> String {
    format!("/GetStickerReport?orderId={order_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_reason_is_plus_encoded() {
        assert_eq!(
            cancel_order_path("ORD-9", "out of stock"),
            "/Sync/CancelOrder?orderId=ORD-9&reason=out+of+stock"
        );
    }

    #[test]
    fn sticker_path() {
        assert_eq!(
            sticker_report_path("ORD-9"),
            "/GetStickerReport?orderId=ORD-9"
        );
    }
}
