//! Configuration for the sync engine.

use std::time::Duration;

/// Configuration for sync cycles.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the marketplace service.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Page size for the order listing call.
    pub page_size: u32,
    /// Upper bound on tenants dispatched concurrently within a job.
    pub max_concurrent_tenants: usize,
    /// Retry configuration for remote calls.
    pub retry: RetryConfig,
    /// Interval for the scheduled runner.
    pub sync_interval: Option<Duration>,
}

impl EngineConfig {
    /// Creates a configuration for the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            page_size: 1000,
            max_concurrent_tenants: 4,
            retry: RetryConfig::default(),
            sync_interval: None,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the order listing page size.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Sets the tenant concurrency bound.
    pub fn with_max_concurrent_tenants(mut self, workers: usize) -> Self {
        self.max_concurrent_tenants = workers.max(1);
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the interval for the scheduled runner.
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = Some(interval);
        self
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each attempt after that.
    pub base_delay: Duration,
    /// Ceiling on any single delay.
    pub max_delay: Duration,
}

impl RetryConfig {
    /// Creates a retry configuration with the given attempt bound.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        }
    }

    /// A configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the delay ceiling.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay after the failed attempt numbered `attempt` (0-based):
    /// `base_delay * 2^attempt`, capped at `max_delay`.
    ///
    /// Deliberately jitter-free so the schedule is exact and testable.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_builder() {
        let config = EngineConfig::new("https://market.example/api")
            .with_timeout(Duration::from_secs(10))
            .with_page_size(200)
            .with_max_concurrent_tenants(8);

        assert_eq!(config.base_url, "https://market.example/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.page_size, 200);
        assert_eq!(config.max_concurrent_tenants, 8);
    }

    #[test]
    fn concurrency_bound_is_at_least_one() {
        let config = EngineConfig::new("x").with_max_concurrent_tenants(0);
        assert_eq!(config.max_concurrent_tenants, 1);
    }

    #[test]
    fn backoff_schedule_is_exact() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(8));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(16));
    }

    #[test]
    fn backoff_respects_ceiling() {
        let config = RetryConfig::new(10)
            .with_base_delay(Duration::from_secs(2))
            .with_max_delay(Duration::from_secs(20));
        assert_eq!(config.delay_for_attempt(6), Duration::from_secs(20));
    }

    #[test]
    fn no_retry_config() {
        assert_eq!(RetryConfig::no_retry().max_attempts, 1);
    }
}
