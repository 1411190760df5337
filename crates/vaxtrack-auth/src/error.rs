//! Authentication error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while talking to the identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider rejected a sign-up.
    #[error("registration failed: {0}")]
    RegistrationFailed(String),

    /// The provider rejected a sign-in.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// Too many attempts, rate limited by the provider.
    #[error("rate limited")]
    RateLimited,

    /// An internal or transport error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::RegistrationFailed(_) => 400,
            Self::LoginFailed(_) => 401,
            Self::RateLimited => 429,
            Self::Internal(_) => 500,
        }
    }
}
