//! CLI command implementations.

pub mod cycle;
pub mod inspect;
pub mod run;

use shopsync_engine::{
    EngineConfig, HttpTransport, ReqwestClient, SnapshotStore, SyncEngine,
};
use std::path::Path;

/// The engine as the CLI wires it up: JSON snapshot store, blocking HTTP.
pub type MarketEngine = SyncEngine<SnapshotStore, HttpTransport<ReqwestClient>>;

/// Opens the store and builds an engine against the live marketplace API.
pub fn open_engine(
    store_path: &Path,
    base_url: &str,
    config: EngineConfig,
) -> Result<MarketEngine, Box<dyn std::error::Error>> {
    let store = SnapshotStore::open(store_path)?;
    let client = ReqwestClient::new(config.timeout)?;
    let transport = HttpTransport::new(base_url, client);
    Ok(SyncEngine::new(config, store, transport))
}
