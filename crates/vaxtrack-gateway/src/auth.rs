//! Request authentication extractor.
//!
//! Resolves the `Authorization: Bearer <token>` header through the identity
//! provider. A missing header or an absent session short-circuits the
//! request with a "please log in" response before any store access.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use vaxtrack_auth::{IdentityGateway, ProfileRegistry};
use vaxtrack_core::UserId;
use vaxtrack_records::Records;

use crate::error::ApiError;
use crate::state::GatewayState;

/// The authenticated user behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The resolved user id.
    pub user_id: UserId,
}

#[async_trait]
impl<R, I, P> FromRequestParts<GatewayState<R, I, P>> for AuthUser
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState<R, I, P>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::NotLoggedIn)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::NotLoggedIn)?;

        match state.identity.current_user(token).await? {
            Some(user_id) => Ok(Self { user_id }),
            None => Err(ApiError::NotLoggedIn),
        }
    }
}
