//! Time source abstraction for testability
//!
//! Snapshot names carry a seconds-resolution timestamp, so tests that create
//! several snapshots in a row need a clock they can step.

use chrono::{Local, NaiveDateTime};

/// Source of the timestamp embedded in snapshot names
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in local time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Deterministic clocks for tests
/// Available for use in external test crates
pub mod mock {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::sync::{Arc, Mutex};

    /// Clock that returns a fixed start time and advances by `step` on every call
    #[derive(Clone, Debug)]
    pub struct MockClock {
        current: Arc<Mutex<NaiveDateTime>>,
        step: Duration,
    }

    impl MockClock {
        pub fn new(start: NaiveDateTime) -> Self {
            Self {
                current: Arc::new(Mutex::new(start)),
                step: Duration::seconds(1),
            }
        }

        /// 2025-01-01 00:00:00, one second per call
        pub fn starting_2025() -> Self {
            let start = NaiveDate::from_ymd_opt(2025, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default();
            Self::new(start)
        }

        /// Advance by `step` on every call (zero freezes the clock)
        pub fn with_step(mut self, step: Duration) -> Self {
            self.step = step;
            self
        }

        /// Set the time the next call will return
        pub fn set(&self, time: NaiveDateTime) {
            *self.current.lock().unwrap() = time;
        }

        /// The time the next call will return, without advancing
        pub fn peek(&self) -> NaiveDateTime {
            *self.current.lock().unwrap()
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> NaiveDateTime {
            let mut current = self.current.lock().unwrap();
            let now = *current;
            *current = now + self.step;
            now
        }
    }
}
