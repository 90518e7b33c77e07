//! # Helpdesk Testing
//!
//! Testing utilities and helpers for the helpdesk engine.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - The [`ReducerTest`] Given/When/Then builder
//! - Assertion helpers for reducer effects
//!
//! ## Example
//!
//! ```ignore
//! use helpdesk_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(TriageQueueReducer::new())
//!     .with_env(QueueEnvironment::new(lifecycle, OperatorRef::new(1, "Anna")))
//!     .given_state(TriageQueueState::default())
//!     .when_action(TriageQueueAction::Select { id })
//!     .then_state(move |state| assert_eq!(state.selected_id(), Some(id)))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use helpdesk_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::RwLock;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use helpdesk_testing::mocks::FixedClock;
    /// use helpdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock whose time is moved explicitly by the test
    ///
    /// Useful when a scenario needs `updated_at` and `responded_at` to differ
    /// from `created_at`.
    #[derive(Debug)]
    pub struct ManualClock {
        time: RwLock<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Create a clock starting at `time`
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: RwLock::new(time),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            let mut time = self.time.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            *time = to;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.read().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_time())
    }

    /// The instant `test_clock()` is frozen at
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp literal is valid RFC 3339.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, test_clock, test_time};
pub use reducer_test::{ReducerTest, assertions};
