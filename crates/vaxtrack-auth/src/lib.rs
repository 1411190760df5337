//! Identity and profile collaborators for vaxtrack.
//!
//! This crate holds the two external collaborators of the system and the
//! password handling between them:
//!
//! - [`IdentityGateway`] / [`IdentityClient`]: the external identity
//!   provider. It issues the stable user id at sign-up and resolves bearer
//!   tokens to the current user. An absent session is a "please log in"
//!   outcome, not an error.
//! - [`ProfileRegistry`] / [`HttpProfileRegistry`]: the document store
//!   holding one profile per email, written with merge semantics at
//!   registration.
//! - [`password`]: the sign-up policy and the salted hashing that keeps
//!   plaintext passwords out of the record store.
//!
//! # Example
//!
//! ```no_run
//! use vaxtrack_auth::{AuthConfig, IdentityClient, IdentityGateway};
//!
//! # async fn example() -> vaxtrack_auth::Result<()> {
//! let client = IdentityClient::new(AuthConfig::default());
//!
//! match client.current_user("bearer-token").await? {
//!     Some(user_id) => println!("signed in as {user_id}"),
//!     None => println!("please log in"),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod identity;
pub mod password;
pub mod profile;

pub use client::{CredentialsRequest, IdentityClient};
pub use error::{AuthError, Result};
pub use identity::{IdentityGateway, IdentityUser, SignInResponse};
pub use profile::{HttpProfileRegistry, ProfileRegistry, RegistryError, UserProfile};

#[cfg(any(test, feature = "test-utils"))]
pub use identity::StaticIdentity;
#[cfg(any(test, feature = "test-utils"))]
pub use profile::NullRegistry;

/// Configuration for the identity provider client.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Base URL of the identity provider API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl AuthConfig {
    /// Get the sign-up endpoint URL.
    #[must_use]
    pub fn sign_up_url(&self) -> String {
        format!("{}/v1/users", self.base_url)
    }

    /// Get the sign-in endpoint URL.
    #[must_use]
    pub fn sign_in_url(&self) -> String {
        format!("{}/v1/sessions", self.base_url)
    }

    /// Get the session introspection endpoint URL.
    #[must_use]
    pub fn session_url(&self) -> String {
        format!("{}/v1/sessions/current", self.base_url)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "https://id.vaxtrack.app".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.base_url, "https://id.vaxtrack.app");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn config_urls() {
        let config = AuthConfig::default();
        assert_eq!(config.sign_up_url(), "https://id.vaxtrack.app/v1/users");
        assert_eq!(config.sign_in_url(), "https://id.vaxtrack.app/v1/sessions");
        assert_eq!(
            config.session_url(),
            "https://id.vaxtrack.app/v1/sessions/current"
        );
    }
}
