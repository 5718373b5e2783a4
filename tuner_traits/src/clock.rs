use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Clock abstraction used by the heartbeat and the event loop.
///
/// - sleep(): sleeps for the provided duration (implementations may simulate)
/// - unix_secs(): wall-clock time in seconds since the Unix epoch
pub trait Clock {
    fn sleep(&self, d: Duration);
    fn unix_secs(&self) -> f64;
}

/// Default, real-time clock backed by `thread::sleep` and `SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }

    fn unix_secs(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_clock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Deterministic clock whose time only moves when told to.
    ///
    /// unix_secs() = base + offset.
    /// sleep(d) advances internal time by d and yields instead of sleeping.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        base_unix_secs: f64,
        offset: Arc<Mutex<Duration>>,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestClock {
        pub fn new() -> Self {
            Self::starting_at(1_700_000_000.0)
        }

        /// Clock whose wall time starts at `unix_secs`.
        pub fn starting_at(unix_secs: f64) -> Self {
            Self {
                base_unix_secs: unix_secs,
                offset: Arc::new(Mutex::new(Duration::ZERO)),
            }
        }

        pub fn advance(&self, d: Duration) {
            if let Ok(mut off) = self.offset.lock() {
                *off = off.saturating_add(d);
            }
        }

        pub fn elapsed(&self) -> Duration {
            self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO)
        }
    }

    impl Clock for TestClock {
        fn sleep(&self, d: Duration) {
            self.advance(d);
            // Keep background loops driven by this clock from spinning hot.
            thread::yield_now();
        }

        fn unix_secs(&self) -> f64 {
            self.base_unix_secs + self.elapsed().as_secs_f64()
        }
    }

}
