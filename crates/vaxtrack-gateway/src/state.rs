//! Gateway application state.
//!
//! This module defines the shared state available to all request handlers.

use std::sync::Arc;

use vaxtrack_auth::{IdentityGateway, ProfileRegistry};
use vaxtrack_records::Records;
use vaxtrack_reminders::ReminderScheduler;

use crate::config::GatewayConfig;

/// Shared application state for the gateway.
///
/// Holds the record service and the external collaborators: identity
/// provider, profile registry, and reminder scheduler.
pub struct GatewayState<R, I, P>
where
    R: Records,
    I: IdentityGateway,
    P: ProfileRegistry,
{
    /// The record lifecycle service.
    pub records: Arc<R>,
    /// The external identity provider.
    pub identity: Arc<I>,
    /// The profile document registry.
    pub profiles: Arc<P>,
    /// The dose reminder scheduler.
    pub reminders: Arc<dyn ReminderScheduler>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<R, I, P> GatewayState<R, I, P>
where
    R: Records,
    I: IdentityGateway,
    P: ProfileRegistry,
{
    /// Create a new gateway state.
    #[must_use]
    pub fn new(
        records: Arc<R>,
        identity: Arc<I>,
        profiles: Arc<P>,
        reminders: Arc<dyn ReminderScheduler>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            records,
            identity,
            profiles,
            reminders,
            config,
        }
    }
}

impl<R, I, P> Clone for GatewayState<R, I, P>
where
    R: Records,
    I: IdentityGateway,
    P: ProfileRegistry,
{
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            identity: Arc::clone(&self.identity),
            profiles: Arc::clone(&self.profiles),
            reminders: Arc::clone(&self.reminders),
            config: self.config.clone(),
        }
    }
}
