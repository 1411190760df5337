//! Dose reminder scheduling for vaxtrack.
//!
//! This crate provides the [`ReminderScheduler`] trait and the
//! [`LocalScheduler`] implementation that arms one in-process timer per
//! vaccine name. Scheduling is fire-and-forget: arming never fails, there
//! is no acknowledgment, and re-arming a vaccine replaces its pending
//! reminder.
//!
//! # Example
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use vaxtrack_reminders::{LocalScheduler, ReminderScheduler};
//!
//! # async fn example() {
//! let scheduler = LocalScheduler::new();
//! let mut fired = scheduler.subscribe();
//!
//! scheduler.schedule("MMR", Utc::now() + Duration::days(30));
//!
//! if let Ok(reminder) = fired.recv().await {
//!     println!("time for the next dose of {}", reminder.vaccine_name);
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod scheduler;
pub mod slots;

pub use scheduler::{LocalScheduler, Reminder, ReminderScheduler};
pub use slots::PendingSlots;

#[cfg(any(test, feature = "test-utils"))]
pub use recording::RecordingScheduler;

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use chrono::{DateTime, Utc};
    use parking_lot::Mutex;

    use crate::scheduler::ReminderScheduler;

    /// A scheduler that only records what was armed; for tests.
    #[derive(Debug, Default)]
    pub struct RecordingScheduler {
        armed: Mutex<Vec<(String, DateTime<Utc>)>>,
    }

    impl RecordingScheduler {
        /// Create an empty recording scheduler.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Everything armed so far, in order.
        #[must_use]
        pub fn armed(&self) -> Vec<(String, DateTime<Utc>)> {
            self.armed.lock().clone()
        }
    }

    impl ReminderScheduler for RecordingScheduler {
        fn schedule(&self, vaccine_name: &str, fire_at: DateTime<Utc>) {
            self.armed.lock().push((vaccine_name.to_string(), fire_at));
        }
    }
}
