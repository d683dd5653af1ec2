//! Bounded exponential-backoff retry for remote calls.

use crate::clock::{Clock, SystemClock};
use crate::config::RetryConfig;
use crate::error::{SyncError, SyncResult};
use std::sync::Arc;

/// Wraps a remote call with bounded exponential-backoff retry.
///
/// A retryable failure on attempt `n` (0-based) waits
/// `base_delay * 2^n` before the next attempt. After `max_attempts`
/// consecutive failures the executor returns [`SyncError::Exhausted`];
/// callers treat that as a soft failure: log, skip the unit of work,
/// continue the cycle. Non-retryable errors are returned immediately.
///
/// No attempt state is shared across calls.
pub struct RetryExecutor {
    config: RetryConfig,
    clock: Arc<dyn Clock>,
}

impl RetryExecutor {
    /// Creates an executor sleeping on the wall clock.
    pub fn new(config: RetryConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an executor with an injected clock.
    pub fn with_clock(config: RetryConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Returns the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Invokes `operation` until it succeeds, fails non-retryably, or the
    /// attempt budget is spent.
    pub fn execute<T>(&self, mut operation: impl FnMut() -> SyncResult<T>) -> SyncResult<T> {
        let mut last_error = None;

        for attempt in 0..self.config.max_attempts {
            match operation() {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() => {
                    if attempt + 1 < self.config.max_attempts {
                        let delay = self.config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            delay_secs = delay.as_secs_f64(),
                            error = %error,
                            "remote call failed, backing off"
                        );
                        self.clock.sleep(delay);
                    }
                    last_error = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        Err(SyncError::Exhausted {
            attempts: self.config.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn executor(clock: Arc<ManualClock>) -> RetryExecutor {
        RetryExecutor::with_clock(RetryConfig::default(), clock)
    }

    #[test]
    fn always_failing_operation_is_invoked_exactly_max_attempts_times() {
        let clock = Arc::new(ManualClock::new());
        let calls = AtomicU32::new(0);

        let result: SyncResult<()> = executor(Arc::clone(&clock)).execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SyncError::transport_retryable("connection refused"))
        });

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(matches!(result, Err(SyncError::Exhausted { attempts: 5, .. })));
    }

    #[test]
    fn success_on_attempt_k_stops_after_k_invocations() {
        let clock = Arc::new(ManualClock::new());
        let calls = AtomicU32::new(0);

        let result = executor(Arc::clone(&clock)).execute(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(SyncError::transport_retryable("flaky"))
            } else {
                Ok(n)
            }
        });

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_waits_are_2_4_8_16_seconds() {
        let clock = Arc::new(ManualClock::new());

        let _: SyncResult<()> = executor(Arc::clone(&clock))
            .execute(|| Err(SyncError::transport_retryable("down")));

        assert_eq!(
            clock.slept(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
                Duration::from_secs(16),
            ]
        );
    }

    #[test]
    fn non_retryable_error_returns_immediately() {
        let clock = Arc::new(ManualClock::new());
        let calls = AtomicU32::new(0);

        let result: SyncResult<()> = executor(Arc::clone(&clock)).execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SyncError::transport_fatal("bad certificate"))
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SyncError::Transport { .. })));
        assert!(clock.slept().is_empty());
    }

    #[test]
    fn no_sleep_after_final_attempt() {
        let clock = Arc::new(ManualClock::new());

        let _: SyncResult<()> = executor(Arc::clone(&clock))
            .execute(|| Err(SyncError::transport_retryable("down")));

        // Four waits between five attempts.
        assert_eq!(clock.slept().len(), 4);
    }
}
