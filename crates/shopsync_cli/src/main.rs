//! ShopSync CLI
//!
//! Command-line front end for the marketplace sync engine.
//!
//! # Commands
//!
//! - `cycle` - Run one full sync cycle over all jobs
//! - `job` - Run a single sync job
//! - `run` - Run cycles on a fixed interval until interrupted
//! - `inspect` - Display store statistics
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use shopsync_engine::JobKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ShopSync command-line tools.
#[derive(Parser)]
#[command(name = "shopsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON store snapshot
    #[arg(global = true, short, long)]
    store: Option<PathBuf>,

    /// Base URL of the marketplace API
    #[arg(global = true, short, long)]
    base_url: Option<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Job names accepted by `shopsync job`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum JobArg {
    /// Catalog dispatch
    Catalog,
    /// Stock dispatch
    Stock,
    /// Price dispatch
    Price,
    /// Order ingestion
    OrderIngest,
    /// Order lifecycle advancement
    OrderLifecycle,
}

impl From<JobArg> for JobKind {
    fn from(arg: JobArg) -> Self {
        match arg {
            JobArg::Catalog => JobKind::Catalog,
            JobArg::Stock => JobKind::Stock,
            JobArg::Price => JobKind::Price,
            JobArg::OrderIngest => JobKind::OrderIngest,
            JobArg::OrderLifecycle => JobKind::OrderLifecycle,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full sync cycle over all jobs
    Cycle {
        /// Maximum tenants synced in parallel
        #[arg(short, long, default_value = "4")]
        workers: usize,
    },

    /// Run a single sync job
    Job {
        /// Which job to run
        #[arg(value_enum)]
        job: JobArg,

        /// Maximum tenants synced in parallel
        #[arg(short, long, default_value = "4")]
        workers: usize,
    },

    /// Run cycles on a fixed interval until interrupted
    Run {
        /// Seconds between cycle starts
        #[arg(short, long, default_value = "300")]
        interval: u64,

        /// Maximum tenants synced in parallel
        #[arg(short, long, default_value = "4")]
        workers: usize,
    },

    /// Display store statistics
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Cycle { workers } => {
            let store = cli.store.ok_or("Store path required for cycle")?;
            let base_url = cli.base_url.ok_or("Base URL required for cycle")?;
            commands::cycle::run_cycle(&store, &base_url, workers)?;
        }
        Commands::Job { job, workers } => {
            let store = cli.store.ok_or("Store path required for job")?;
            let base_url = cli.base_url.ok_or("Base URL required for job")?;
            commands::cycle::run_single(&store, &base_url, workers, job.into())?;
        }
        Commands::Run { interval, workers } => {
            let store = cli.store.ok_or("Store path required for run")?;
            let base_url = cli.base_url.ok_or("Base URL required for run")?;
            commands::run::run(&store, &base_url, workers, interval)?;
        }
        Commands::Inspect { format } => {
            let store = cli.store.ok_or("Store path required for inspect")?;
            commands::inspect::run(&store, &format)?;
        }
        Commands::Version => {
            println!("ShopSync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
