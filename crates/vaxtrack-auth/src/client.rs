//! HTTP client for the external identity provider.
//!
//! This module provides sign-up, sign-in, and session introspection against
//! the identity provider's API. The provider issues the stable user id at
//! sign-up; the rest of the system never mints user identifiers itself.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vaxtrack_core::UserId;

use crate::error::{AuthError, Result};
use crate::identity::{IdentityGateway, IdentityUser, SignInResponse};
use crate::AuthConfig;

/// Request payload for email/password sign-up and sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsRequest {
    /// User's email address.
    pub email: String,
    /// User's password. Sent only to the identity provider; never stored.
    pub password: String,
}

/// Raw response from provider sign-up/sign-in endpoints.
#[derive(Debug, Deserialize)]
struct RawIdentityResponse {
    user_id: String,
    #[serde(default)]
    access_token: Option<String>,
}

/// Raw response from session introspection.
#[derive(Debug, Deserialize)]
struct RawSessionResponse {
    user_id: String,
}

/// Error response from the provider API.
#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    code: String,
    #[allow(dead_code)]
    message: Option<String>,
}

/// Client for the identity provider API.
pub struct IdentityClient {
    config: AuthConfig,
    client: reqwest::Client,
}

impl IdentityClient {
    /// Create a new identity client with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should never happen
    /// with default TLS).
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    /// Decode a provider response, mapping error codes onto [`AuthError`].
    async fn decode_identity(
        response: reqwest::Response,
        registering: bool,
    ) -> Result<RawIdentityResponse> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| AuthError::Internal(format!("invalid response: {e}")));
        }

        let error_response: Option<ProviderErrorResponse> = response.json().await.ok();
        let failed = |reason: String| {
            if registering {
                AuthError::RegistrationFailed(reason)
            } else {
                AuthError::LoginFailed(reason)
            }
        };

        match error_response {
            Some(err) => match err.code.as_str() {
                "EMAIL_IN_USE" => Err(AuthError::RegistrationFailed(
                    "email already in use".to_string(),
                )),
                "UNAUTHORIZED" | "INVALID_CREDENTIALS" => {
                    Err(failed("invalid credentials".to_string()))
                }
                "RATE_LIMITED" => Err(AuthError::RateLimited),
                code => Err(failed(format!("error code: {code}"))),
            },
            None => match status.as_u16() {
                400 | 401 | 403 | 409 | 422 => Err(failed(format!("HTTP {status}"))),
                429 => Err(AuthError::RateLimited),
                _ => Err(AuthError::Internal(format!("HTTP {status}"))),
            },
        }
    }
}

#[async_trait]
impl IdentityGateway for IdentityClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser> {
        let response = self
            .client
            .post(self.config.sign_up_url())
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("request failed: {e}")))?;

        let raw = Self::decode_identity(response, true).await?;
        Ok(IdentityUser {
            user_id: parse_user_id(&raw.user_id)?,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse> {
        let response = self
            .client
            .post(self.config.sign_in_url())
            .json(&CredentialsRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("request failed: {e}")))?;

        let raw = Self::decode_identity(response, false).await?;
        let access_token = raw
            .access_token
            .ok_or_else(|| AuthError::Internal("missing access_token in response".to_string()))?;
        Ok(SignInResponse {
            user_id: parse_user_id(&raw.user_id)?,
            access_token,
        })
    }

    async fn current_user(&self, token: &str) -> Result<Option<UserId>> {
        let response = self
            .client
            .get(self.config.session_url())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Internal(format!("request failed: {e}")))?;

        let status = response.status();
        if status.as_u16() == 401 {
            // No valid session; the caller must log in.
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::Internal(format!("HTTP {status}")));
        }

        let raw: RawSessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Internal(format!("invalid response: {e}")))?;
        Ok(Some(parse_user_id(&raw.user_id)?))
    }
}

fn parse_user_id(raw: &str) -> Result<UserId> {
    UserId::new(raw).map_err(|_| AuthError::Internal("blank user_id in response".to_string()))
}
