//! Local reminder scheduling.
//!
//! Arms one timer per vaccine name and delivers the fired reminder on a
//! broadcast channel. The contract is fire-and-forget: arming never fails
//! and there is no acknowledgment. A fire time already in the past fires
//! immediately.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::slots::PendingSlots;

/// Capacity of the fired-reminder channel.
const FIRED_CHANNEL_CAPACITY: usize = 64;

/// A dose reminder that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Vaccine the reminder is for.
    pub vaccine_name: String,
    /// The instant the reminder was armed for.
    pub fire_at: DateTime<Utc>,
}

/// Arranges a future local callback per vaccine dose.
pub trait ReminderScheduler: Send + Sync {
    /// Arm a reminder for the vaccine at the given instant.
    ///
    /// Re-arming a vaccine that already has a pending reminder replaces
    /// it; the previous timer never fires.
    fn schedule(&self, vaccine_name: &str, fire_at: DateTime<Utc>);
}

/// Timer-backed scheduler delivering reminders in-process.
///
/// Must be used from within a tokio runtime.
pub struct LocalScheduler {
    slots: Arc<PendingSlots>,
    fired: broadcast::Sender<Reminder>,
}

impl LocalScheduler {
    /// Create a scheduler with no pending reminders.
    #[must_use]
    pub fn new() -> Self {
        let (fired, _) = broadcast::channel(FIRED_CHANNEL_CAPACITY);
        Self {
            slots: Arc::new(PendingSlots::new()),
            fired,
        }
    }

    /// Subscribe to reminders as they come due.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Reminder> {
        self.fired.subscribe()
    }

    /// Number of reminders currently pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots.len()
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderScheduler for LocalScheduler {
    fn schedule(&self, vaccine_name: &str, fire_at: DateTime<Utc>) {
        let delay = (fire_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let reminder = Reminder {
            vaccine_name: vaccine_name.to_string(),
            fire_at,
        };

        let fired = self.fired.clone();
        let slots = Arc::clone(&self.slots);
        let slot_key = vaccine_name.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::info!(vaccine = %reminder.vaccine_name, "dose reminder due");
            slots.release(&reminder.vaccine_name);
            // Nobody listening is fine; delivery is best-effort.
            let _ = fired.send(reminder);
        });

        if let Some(displaced) = self.slots.claim(slot_key, handle.abort_handle()) {
            displaced.abort();
        }
        tracing::debug!(vaccine = vaccine_name, %fire_at, "reminder armed");
    }
}
