//! Scheduled runner: cycles on a fixed interval until interrupted.

use super::open_engine;
use shopsync_engine::EngineConfig;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Runs cycles every `interval_secs` seconds until Ctrl-C.
///
/// Each cycle runs on a blocking worker so the signal handler stays
/// responsive; the store snapshot is saved after every cycle. An interval
/// shorter than a cycle does not stack runs: the engine refuses a job whose
/// previous run is still in flight.
pub fn run(
    store_path: &Path,
    base_url: &str,
    workers: usize,
    interval_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::new(base_url)
        .with_max_concurrent_tenants(workers)
        .with_sync_interval(Duration::from_secs(interval_secs.max(1)));
    let engine = Arc::new(open_engine(store_path, base_url, config)?);
    let interval = engine
        .config()
        .sync_interval
        .unwrap_or(Duration::from_secs(300));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut ticker = tokio::time::interval(interval);
        tracing::info!(interval_secs, "scheduled runner started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let engine = Arc::clone(&engine);
                    let report = tokio::task::spawn_blocking(move || {
                        let report = engine.run_cycle();
                        engine.store().save().map(|_| report)
                    })
                    .await??;
                    tracing::info!(
                        sent = report.sent(),
                        failed = report.failed(),
                        "cycle saved"
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupt received, stopping");
                    break;
                }
            }
        }
        Ok(())
    })
}
