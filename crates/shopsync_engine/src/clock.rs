//! Clock abstraction so backoff delays are observable in tests.

use parking_lot::Mutex;
use std::time::Duration;

/// Provides the sleep used between retry attempts.
///
/// The engine never sleeps directly; it goes through this trait so tests
/// can verify the backoff schedule without real waiting.
pub trait Clock: Send + Sync {
    /// Blocks the current thread for the given duration.
    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that records requested sleeps instead of performing them.
///
/// Useful for testing retry behavior deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    slept: Mutex<Vec<Duration>>,
}

impl ManualClock {
    /// Creates a new manual clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every sleep requested so far, in order.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }
}

impl Clock for ManualClock {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_records_sleeps() {
        let clock = ManualClock::new();
        clock.sleep(Duration::from_secs(2));
        clock.sleep(Duration::from_secs(4));
        assert_eq!(
            clock.slept(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }
}
