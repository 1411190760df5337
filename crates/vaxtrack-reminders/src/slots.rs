//! Pending reminder slots.
//!
//! One slot per vaccine name: arming a reminder for a vaccine that already
//! has one pending replaces it, so at most one reminder per vaccine is ever
//! in flight.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::task::AbortHandle;

/// A table of pending reminder timers, keyed by vaccine name.
#[derive(Debug, Default)]
pub struct PendingSlots {
    slots: RwLock<HashMap<String, AbortHandle>>,
}

impl PendingSlots {
    /// Create an empty slot table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for a vaccine, returning the previously pending
    /// timer if one was displaced.
    pub fn claim(&self, vaccine_name: String, handle: AbortHandle) -> Option<AbortHandle> {
        self.slots.write().insert(vaccine_name, handle)
    }

    /// Release the slot for a vaccine.
    pub fn release(&self, vaccine_name: &str) -> Option<AbortHandle> {
        self.slots.write().remove(vaccine_name)
    }

    /// Whether a reminder is pending for the vaccine.
    #[must_use]
    pub fn is_pending(&self, vaccine_name: &str) -> bool {
        self.slots.read().contains_key(vaccine_name)
    }

    /// Number of pending reminders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Whether no reminders are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn idle_handle() -> AbortHandle {
        tokio::spawn(std::future::pending::<()>()).abort_handle()
    }

    #[tokio::test]
    async fn claim_and_release() {
        let slots = PendingSlots::new();
        assert!(slots.is_empty());

        let displaced = slots.claim("MMR".to_string(), idle_handle().await);
        assert!(displaced.is_none());
        assert!(slots.is_pending("MMR"));
        assert_eq!(slots.len(), 1);

        assert!(slots.release("MMR").is_some());
        assert!(!slots.is_pending("MMR"));
        assert!(slots.release("MMR").is_none());
    }

    #[tokio::test]
    async fn claiming_again_displaces_previous() {
        let slots = PendingSlots::new();
        slots.claim("MMR".to_string(), idle_handle().await);
        let displaced = slots.claim("MMR".to_string(), idle_handle().await);
        assert!(displaced.is_some());
        assert_eq!(slots.len(), 1);
    }

    #[tokio::test]
    async fn slots_are_per_vaccine() {
        let slots = PendingSlots::new();
        slots.claim("MMR".to_string(), idle_handle().await);
        slots.claim("Tetanus".to_string(), idle_handle().await);
        assert_eq!(slots.len(), 2);
    }
}
