//! Inspect command implementation.

use serde::Serialize;
use shopsync_engine::{OrderStatus, ProcessedState, SnapshotStore};
use std::path::Path;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Store path.
    pub path: String,
    /// Tenants with a credential on file.
    pub credentialed_tenants: usize,
    /// Catalog records pending dispatch.
    pub catalog_pending: usize,
    /// Catalog records already processed.
    pub catalog_processed: usize,
    /// Stock records pending dispatch.
    pub stock_pending: usize,
    /// Stock records already processed.
    pub stock_processed: usize,
    /// Price records pending dispatch.
    pub price_pending: usize,
    /// Price records already processed.
    pub price_processed: usize,
    /// Orders by status.
    pub orders: OrderCounts,
}

/// Order counts by lifecycle status.
#[derive(Debug, Serialize)]
pub struct OrderCounts {
    /// Accepted orders.
    pub accepted: usize,
    /// Ready orders.
    pub ready: usize,
    /// Cancelled orders.
    pub cancelled: usize,
    /// Done orders.
    pub done: usize,
    /// Ready orders still missing a sticker.
    pub awaiting_sticker: usize,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = SnapshotStore::open(path)?;
    let snapshot = store.memory().snapshot();

    let count_state = |records: &[ProcessedState]| {
        let pending = records.iter().filter(|s| s.is_pending()).count();
        (pending, records.len() - pending)
    };
    let (catalog_pending, catalog_processed) =
        count_state(&snapshot.catalog.iter().map(|r| r.state).collect::<Vec<_>>());
    let (stock_pending, stock_processed) =
        count_state(&snapshot.stock.iter().map(|r| r.state).collect::<Vec<_>>());
    let (price_pending, price_processed) =
        count_state(&snapshot.price.iter().map(|r| r.state).collect::<Vec<_>>());

    let by_status =
        |status: OrderStatus| snapshot.orders.iter().filter(|o| o.status == status).count();
    let result = InspectResult {
        path: path.display().to_string(),
        credentialed_tenants: snapshot.credentials.len(),
        catalog_pending,
        catalog_processed,
        stock_pending,
        stock_processed,
        price_pending,
        price_processed,
        orders: OrderCounts {
            accepted: by_status(OrderStatus::Accepted),
            ready: by_status(OrderStatus::Ready),
            cancelled: by_status(OrderStatus::Cancelled),
            done: by_status(OrderStatus::Done),
            awaiting_sticker: snapshot
                .orders
                .iter()
                .filter(|o| o.status == OrderStatus::Ready && o.sticker_missing())
                .count(),
        },
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &InspectResult) {
    println!("ShopSync Store Inspection");
    println!("=========================");
    println!();
    println!("Path: {}", result.path);
    println!("Credentialed tenants: {}", result.credentialed_tenants);
    println!();
    println!("Push queues (pending / processed):");
    println!(
        "  Catalog: {} / {}",
        result.catalog_pending, result.catalog_processed
    );
    println!(
        "  Stock:   {} / {}",
        result.stock_pending, result.stock_processed
    );
    println!(
        "  Price:   {} / {}",
        result.price_pending, result.price_processed
    );
    println!();
    println!("Orders:");
    println!("  Accepted:  {}", result.orders.accepted);
    println!("  Ready:     {}", result.orders.ready);
    println!("  Cancelled: {}", result.orders.cancelled);
    println!("  Done:      {}", result.orders.done);
    println!("  Awaiting sticker: {}", result.orders.awaiting_sticker);
}
