//! API error types and responses.
//!
//! Every error raised inside an operation is converted here into a single
//! structured response; nothing ever terminates the process. Successful
//! no-ops (deleting an absent key) are not errors and never pass through
//! this module.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vaxtrack_auth::{AuthError, RegistryError};
use vaxtrack_records::RecordsError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session; the caller must log in before the operation runs.
    #[error("please log in")]
    NotLoggedIn,

    /// Credentials were rejected at sign-in.
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// Invalid request body or parameters.
    #[error("{0}")]
    BadRequest(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Too many requests against the identity provider.
    #[error("rate limited")]
    RateLimited,

    /// Internal server error; carries the underlying message.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotLoggedIn | Self::LoginFailed(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "not_logged_in",
            Self::LoginFailed(_) => "login_failed",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::RateLimited => "rate_limited",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RecordsError> for ApiError {
    fn from(err: RecordsError) -> Self {
        match err {
            RecordsError::Validation(e) => Self::BadRequest(e.to_string()),
            RecordsError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::RegistrationFailed(reason) => {
                Self::BadRequest(format!("registration failed: {reason}"))
            }
            AuthError::LoginFailed(reason) => Self::LoginFailed(reason),
            AuthError::RateLimited => Self::RateLimited,
            AuthError::Internal(reason) => Self::Internal(reason),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaxtrack_records::ValidationError;
    use vaxtrack_store::StoreError;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::NotLoggedIn.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::BadRequest("nope".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("schedule 9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_failures_map_to_bad_request() {
        let err = ApiError::from(RecordsError::Validation(ValidationError::DateOutOfRange));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("date out of range"));
    }

    #[test]
    fn store_failures_carry_the_underlying_message() {
        let err = ApiError::from(RecordsError::Store(StoreError::Execution(
            "constraint violated".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("constraint violated"));
    }

    #[test]
    fn please_log_in_message() {
        assert_eq!(ApiError::NotLoggedIn.to_string(), "please log in");
    }
}
