//! The sync engine facade.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::jobs::{self, JobKind, JobReport};
use crate::retry::RetryExecutor;
use crate::store::SyncStore;
use crate::transport::MarketTransport;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a requested job run ended.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// The job ran; here is its report.
    Ran(JobReport),
    /// A previous run of the same job was still in flight; nothing was done.
    Overlapped(JobKind),
}

impl JobOutcome {
    /// The report, if the job actually ran.
    pub fn report(&self) -> Option<&JobReport> {
        match self {
            JobOutcome::Ran(report) => Some(report),
            JobOutcome::Overlapped(_) => None,
        }
    }
}

/// Result of one full cycle over all five jobs.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Per-job outcomes, in execution order.
    pub jobs: Vec<JobOutcome>,
    /// Wall time of the cycle.
    pub duration: Duration,
}

impl CycleReport {
    /// Total records acknowledged across all jobs that ran.
    pub fn sent(&self) -> usize {
        self.jobs
            .iter()
            .filter_map(JobOutcome::report)
            .map(JobReport::sent)
            .sum()
    }

    /// Total records that failed across all jobs that ran.
    pub fn failed(&self) -> usize {
        self.jobs
            .iter()
            .filter_map(JobOutcome::report)
            .map(JobReport::failed)
            .sum()
    }
}

/// Running totals across cycles.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Full cycles completed.
    pub cycles_completed: u64,
    /// Records acknowledged by the remote service.
    pub records_sent: u64,
    /// Records that failed and stayed pending.
    pub records_failed: u64,
    /// Tenant batches skipped for lack of a credential.
    pub tenants_skipped: u64,
    /// Job runs refused because the previous run was still in flight.
    pub jobs_overlapped: u64,
    /// When the last cycle finished.
    pub last_cycle_time: Option<Instant>,
    /// Most recent tenant-level failure message, if any.
    pub last_error: Option<String>,
}

/// One mutex per job. A job run holds its mutex for the whole run, so a
/// second request for the same job while the first is in flight is refused
/// rather than queued; distinct jobs never block each other.
#[derive(Default)]
struct JobGuards {
    catalog: Mutex<()>,
    stock: Mutex<()>,
    price: Mutex<()>,
    order_ingest: Mutex<()>,
    order_lifecycle: Mutex<()>,
}

impl JobGuards {
    fn for_job(&self, job: JobKind) -> &Mutex<()> {
        match job {
            JobKind::Catalog => &self.catalog,
            JobKind::Stock => &self.stock,
            JobKind::Price => &self.price,
            JobKind::OrderIngest => &self.order_ingest,
            JobKind::OrderLifecycle => &self.order_lifecycle,
        }
    }
}

/// Drives the five sync jobs against a store and a transport.
///
/// The engine itself holds no tenant or record state; everything it needs
/// it reads from the store at the start of each job run, so runs are safe
/// to trigger from a scheduler and from an operator at the same time.
pub struct SyncEngine<S: SyncStore, T: MarketTransport> {
    config: EngineConfig,
    store: Arc<S>,
    transport: Arc<T>,
    retry: RetryExecutor,
    guards: JobGuards,
    stats: RwLock<SyncStats>,
}

impl<S: SyncStore, T: MarketTransport> SyncEngine<S, T> {
    /// Creates an engine sleeping on the wall clock between retries.
    pub fn new(config: EngineConfig, store: S, transport: T) -> Self {
        let retry = RetryExecutor::new(config.retry.clone());
        Self {
            config,
            store: Arc::new(store),
            transport: Arc::new(transport),
            retry,
            guards: JobGuards::default(),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Creates an engine with an injected retry clock.
    pub fn with_clock(config: EngineConfig, store: S, transport: T, clock: Arc<dyn Clock>) -> Self {
        let retry = RetryExecutor::with_clock(config.retry.clone(), clock);
        Self {
            config,
            store: Arc::new(store),
            transport: Arc::new(transport),
            retry,
            guards: JobGuards::default(),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The store behind the engine.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// A snapshot of the running totals.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Runs one job, unless the same job is already in flight.
    pub fn run_job(&self, job: JobKind) -> JobOutcome {
        let guard = match self.guards.for_job(job).try_lock() {
            Some(guard) => guard,
            None => {
                tracing::warn!(job = job.as_str(), "previous run still in flight, skipping");
                self.stats.write().jobs_overlapped += 1;
                return JobOutcome::Overlapped(job);
            }
        };

        let workers = self.config.max_concurrent_tenants;
        let report = match job {
            JobKind::Catalog => {
                jobs::catalog::run(self.store.as_ref(), self.transport.as_ref(), &self.retry, workers)
            }
            JobKind::Stock => {
                jobs::stock::run(self.store.as_ref(), self.transport.as_ref(), &self.retry, workers)
            }
            JobKind::Price => {
                jobs::price::run(self.store.as_ref(), self.transport.as_ref(), &self.retry, workers)
            }
            JobKind::OrderIngest => jobs::ingest::run(
                self.store.as_ref(),
                self.transport.as_ref(),
                &self.retry,
                workers,
                self.config.page_size,
            ),
            JobKind::OrderLifecycle => jobs::lifecycle::run(
                self.store.as_ref(),
                self.transport.as_ref(),
                &self.retry,
                workers,
            ),
        };
        drop(guard);

        tracing::info!(
            job = job.as_str(),
            sent = report.sent(),
            failed = report.failed(),
            skipped_tenants = report.skipped_tenants(),
            duration_ms = report.duration.as_millis() as u64,
            "job run finished"
        );
        {
            let mut stats = self.stats.write();
            stats.records_sent += report.sent() as u64;
            stats.records_failed += report.failed() as u64;
            stats.tenants_skipped += report.skipped_tenants() as u64;
            if let Some(message) = report.tenants.iter().find_map(|t| match &t.status {
                crate::jobs::TenantStatus::Failed(message) => Some(message.clone()),
                _ => None,
            }) {
                stats.last_error = Some(message);
            }
        }
        JobOutcome::Ran(report)
    }

    /// Runs all five jobs once, in the push / ingest / advance order.
    pub fn run_cycle(&self) -> CycleReport {
        let start = Instant::now();
        let jobs = [
            JobKind::Catalog,
            JobKind::Stock,
            JobKind::Price,
            JobKind::OrderIngest,
            JobKind::OrderLifecycle,
        ]
        .into_iter()
        .map(|job| self.run_job(job))
        .collect();

        let duration = start.elapsed();
        {
            let mut stats = self.stats.write();
            stats.cycles_completed += 1;
            stats.last_cycle_time = Some(Instant::now());
        }
        tracing::info!(duration_ms = duration.as_millis() as u64, "cycle finished");
        CycleReport { jobs, duration }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::memory::MemoryStore;
    use crate::store::{OrderStatus, ProcessedState};
    use crate::testutil;
    use crate::transport::MockTransport;
    use shopsync_protocol::{OrderListResponse, OrderLine, RemoteOrder};

    fn engine_config() -> EngineConfig {
        let mut config = EngineConfig::new("https://market.example");
        config.retry = RetryConfig::no_retry();
        config
    }

    fn remote_order(id: i64, order_id: &str) -> RemoteOrder {
        RemoteOrder {
            id,
            create_date: "2026-02-01T08:00:00".into(),
            order_id: order_id.into(),
            order_details: vec![OrderLine {
                quantity: 2,
                unit_price: 4.5,
                product_no: "P-1".into(),
                product_description: "Mug".into(),
            }],
            recipient_name: "Arta K".into(),
            recipient_city: "Tirana".into(),
            recipient_phone: "+355".into(),
            status: "new".into(),
        }
    }

    #[test]
    fn cycle_pushes_ingests_and_advances() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_catalog(testutil::catalog_record("T1", "EXT-1", vec!["img".into()]));
        store.add_stock(testutil::stock_record("T1", "SKU-1", 5));
        store.add_price(testutil::price_record("T1", "SKU-1"));
        store.put_order(testutil::order(100, "ORD-OLD", OrderStatus::Accepted, true));

        let transport = MockTransport::new();
        transport.set_orders(
            "T1",
            OrderListResponse {
                data: vec![remote_order(7, "ORD-NEW")],
            },
        );

        let engine = SyncEngine::new(engine_config(), store, transport);
        let report = engine.run_cycle();

        assert_eq!(report.jobs.len(), 5);
        assert!(report.jobs.iter().all(|j| j.report().is_some()));

        let store = engine.store();
        assert!(store
            .snapshot()
            .catalog
            .iter()
            .all(|r| r.state == ProcessedState::Processed));
        assert_eq!(store.order_count(), 2);

        let stats = engine.stats();
        assert_eq!(stats.cycles_completed, 1);
        assert_eq!(stats.jobs_overlapped, 0);
        assert!(stats.records_sent >= 4);
    }

    #[test]
    fn same_job_in_flight_is_refused_not_queued() {
        let store = MemoryStore::new();
        let transport = MockTransport::new();
        let engine = SyncEngine::new(engine_config(), store, transport);

        let _held = engine.guards.for_job(JobKind::Price).lock();
        let outcome = engine.run_job(JobKind::Price);

        assert!(matches!(outcome, JobOutcome::Overlapped(JobKind::Price)));
        assert_eq!(engine.stats().jobs_overlapped, 1);
    }

    #[test]
    fn holding_one_job_does_not_block_the_others() {
        let store = MemoryStore::new();
        let transport = MockTransport::new();
        let engine = SyncEngine::new(engine_config(), store, transport);

        let _held = engine.guards.for_job(JobKind::Catalog).lock();
        let outcome = engine.run_job(JobKind::Stock);

        assert!(matches!(outcome, JobOutcome::Ran(_)));
    }

    #[test]
    fn cycle_counters_accumulate() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_price(testutil::price_record("T1", "SKU-1"));
        let transport = MockTransport::new();
        let engine = SyncEngine::new(engine_config(), store, transport);

        engine.run_cycle();
        engine.run_cycle();

        let stats = engine.stats();
        assert_eq!(stats.cycles_completed, 2);
        // The price record was processed in the first cycle only.
        assert_eq!(stats.records_sent, 1);
        assert!(stats.last_cycle_time.is_some());
    }

    #[test]
    fn failed_tenant_is_counted_and_left_pending() {
        let store = MemoryStore::new();
        store.add_credential(testutil::credential("T1"));
        store.add_stock(testutil::stock_record("T1", "SKU-1", 3));
        let transport = MockTransport::new();
        transport.fail_tenant("T1");
        let engine = SyncEngine::new(engine_config(), store, transport);

        let outcome = engine.run_job(JobKind::Stock);

        let report = outcome.report().unwrap();
        assert_eq!(report.failed(), 1);
        assert!(engine.stats().last_error.is_some());
        assert!(engine
            .store()
            .snapshot()
            .stock
            .iter()
            .all(|r| r.state == ProcessedState::Pending));
    }
}
