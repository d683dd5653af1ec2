//! Cycle and single-job command implementations.

use super::open_engine;
use shopsync_engine::{EngineConfig, JobKind, JobOutcome, JobReport};
use std::path::Path;

fn config(base_url: &str, workers: usize) -> EngineConfig {
    EngineConfig::new(base_url).with_max_concurrent_tenants(workers)
}

/// Runs one full cycle and saves the store.
pub fn run_cycle(
    store_path: &Path,
    base_url: &str,
    workers: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(store_path, base_url, config(base_url, workers))?;
    let report = engine.run_cycle();
    engine.store().save()?;

    println!("Cycle finished in {:.1}s", report.duration.as_secs_f64());
    for outcome in &report.jobs {
        print_outcome(outcome);
    }
    println!(
        "Total: {} sent, {} failed",
        report.sent(),
        report.failed()
    );
    Ok(())
}

/// Runs one job and saves the store.
pub fn run_single(
    store_path: &Path,
    base_url: &str,
    workers: usize,
    job: JobKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine(store_path, base_url, config(base_url, workers))?;
    let outcome = engine.run_job(job);
    engine.store().save()?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &JobOutcome) {
    match outcome {
        JobOutcome::Ran(report) => print_report(report),
        JobOutcome::Overlapped(job) => {
            println!("  {:<16} skipped, previous run still in flight", job.as_str());
        }
    }
}

fn print_report(report: &JobReport) {
    println!(
        "  {:<16} {} sent, {} failed, {} tenant(s) skipped ({:.1}s)",
        report.job.as_str(),
        report.sent(),
        report.failed(),
        report.skipped_tenants(),
        report.duration.as_secs_f64()
    );
}
