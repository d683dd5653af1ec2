//! # ShopSync Engine
//!
//! Multi-tenant marketplace sync engine.
//!
//! This crate provides:
//! - Three push jobs (catalog, stock, price) over pending store records
//! - Order ingestion with remote-id deduplication
//! - An order lifecycle machine (accepted → ready → done, cancel path)
//! - Retry with exponential backoff behind an injectable clock
//! - HTTP transport abstraction with a recording mock
//! - A JSON-snapshot store for small deployments
//!
//! ## Architecture
//!
//! Every job follows the same shape: select pending work from the store,
//! group it by tenant, resolve each tenant's credential, and dispatch over
//! a bounded pool of worker threads. The store is the source of truth;
//! records are marked processed only after the remote service acknowledged
//! them, so a crashed or failed cycle re-sends rather than loses work.
//!
//! ## Key Invariants
//!
//! - Credentials come from the store, never from the network
//! - A tenant without a credential is skipped, not failed
//! - One tenant's failure never touches another tenant's batch
//! - An order is inserted at most once per remote id
//! - The same job never runs twice concurrently

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod engine;
mod error;
mod http;
pub mod jobs;
mod memory;
mod retry;
mod select;
mod snapshot;
mod store;
#[cfg(test)]
mod testutil;
mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, RetryConfig};
pub use engine::{CycleReport, JobOutcome, SyncEngine, SyncStats};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpTransport, ReqwestClient};
pub use jobs::{JobKind, JobReport, TenantOutcome, TenantStatus};
pub use memory::MemoryStore;
pub use retry::RetryExecutor;
pub use snapshot::{SnapshotStore, StoreSnapshot};
pub use store::{
    CatalogRecord, Credential, DocumentType, Order, OrderStatus, PriceRecord, ProcessedState,
    StockRecord, StoreError, StoreResult, SyncStore,
};
pub use transport::{MarketTransport, MockTransport, RecordedCall};
