//! HTTP gateway for the vaxtrack record service.
//!
//! The gateway is the outer surface of the system: it resolves the caller's
//! identity, feeds raw request fields into the record lifecycle service,
//! arms dose reminders after successful vaccination saves, and converts
//! every error into a single structured response. Screens and rendering are
//! somebody else's concern; this crate ends at JSON.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::AuthUser;
pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;
