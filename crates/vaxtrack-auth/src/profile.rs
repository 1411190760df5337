//! Client for the user-profile document registry.
//!
//! Profiles live in a document store keyed by email and are written once at
//! registration with merge semantics: fields present in the document replace
//! the stored ones, anything else is left untouched. Failures surface to
//! the caller and are never retried automatically.
//!
//! Profile documents never carry password material.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vaxtrack_core::UserId;

/// A user profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider-issued user key.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Registry document key.
    pub email: String,
}

/// Errors that can occur while writing a profile.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry refused the document.
    #[error("profile upsert rejected: {0}")]
    Rejected(String),

    /// The registry could not be reached.
    #[error("registry unreachable: {0}")]
    Unreachable(String),
}

/// Persists user profile documents keyed by email.
#[async_trait]
pub trait ProfileRegistry: Send + Sync {
    /// Insert or merge the profile document for `profile.email`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`]; the caller decides how to surface it.
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), RegistryError>;
}

/// HTTP-backed profile registry client.
pub struct HttpProfileRegistry {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProfileRegistry {
    /// Create a client for the registry at `base_url`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should never happen
    /// with default TLS).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn profile_url(&self, email: &str) -> String {
        format!("{}/v1/profiles/{email}", self.base_url)
    }
}

#[async_trait]
impl ProfileRegistry for HttpProfileRegistry {
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), RegistryError> {
        let response = self
            .client
            .put(self.profile_url(&profile.email))
            .query(&[("merge", "true")])
            .json(profile)
            .send()
            .await
            .map_err(|e| RegistryError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(email = %profile.email, "profile upserted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RegistryError::Rejected(format!("HTTP {status}: {body}")))
    }
}

/// A registry that accepts every document; for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRegistry;

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl ProfileRegistry for NullRegistry {
    async fn upsert_profile(&self, _profile: &UserProfile) -> Result<(), RegistryError> {
        Ok(())
    }
}
