//! Account endpoints: registration, sign-in, profile updates.
//!
//! Registration orchestrates the three collaborators in order: the identity
//! provider issues the user id, the record store keeps the user row (with a
//! salted password digest, never the plaintext), and the profile registry
//! receives the profile document. A registry failure surfaces to the caller
//! and is not retried.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use vaxtrack_auth::{password, IdentityGateway, ProfileRegistry, UserProfile};
use vaxtrack_records::{DeleteOutcome, Records};
use vaxtrack_store::User;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    /// First name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Email address; also the profile document key.
    pub email: String,
    /// Password; forwarded to the identity provider, stored only hashed.
    pub password: String,
    /// Must match `password`.
    pub repeat_password: String,
}

/// Response for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The provider-issued user id.
    pub user_id: String,
}

/// Request to sign in.
#[derive(Debug, Deserialize)]
pub struct SignInBody {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Response for a successful sign-in.
#[derive(Debug, Serialize)]
pub struct SignInResponseBody {
    /// The signed-in user.
    pub user_id: String,
    /// Bearer token for subsequent requests.
    pub access_token: String,
}

/// Request to update the signed-in user's account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountBody {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// New password.
    pub password: String,
}

/// Response carrying a delete outcome.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Whether anything was actually removed.
    pub outcome: DeleteOutcome,
}

const WEAK_PASSWORD_MESSAGE: &str =
    "password must be at least 5 characters long and contain a special character \
     (! @ # $ % ^ & *)";

/// `POST /v1/account/register`
pub async fn register<R, I, P>(
    State(state): State<GatewayState<R, I, P>>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    if [&body.name, &body.surname, &body.email, &body.password, &body.repeat_password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(ApiError::BadRequest("please fill in all fields".to_string()));
    }
    if body.password != body.repeat_password {
        return Err(ApiError::BadRequest("passwords do not match".to_string()));
    }
    if !password::meets_policy(&body.password) {
        return Err(ApiError::BadRequest(WEAK_PASSWORD_MESSAGE.to_string()));
    }

    let identity_user = state.identity.sign_up(&body.email, &body.password).await?;

    let user = User {
        user_id: identity_user.user_id,
        name: format!("{} {}", body.name.trim(), body.surname.trim()),
        email: body.email.trim().to_string(),
        password_hash: password::hash_password(&body.password),
    };
    if !state.records.register_user(user.clone()).await? {
        return Err(ApiError::Internal("user row was not saved".to_string()));
    }

    state
        .profiles
        .upsert_profile(&UserProfile {
            user_id: user.user_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        })
        .await?;

    tracing::info!(user_id = %user.user_id, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.user_id.to_string(),
        }),
    ))
}

/// `POST /v1/account/sign-in`
pub async fn sign_in<R, I, P>(
    State(state): State<GatewayState<R, I, P>>,
    Json(body): Json<SignInBody>,
) -> Result<Json<SignInResponseBody>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let session = state.identity.sign_in(&body.email, &body.password).await?;
    Ok(Json(SignInResponseBody {
        user_id: session.user_id.to_string(),
        access_token: session.access_token,
    }))
}

/// `PUT /v1/account`
pub async fn update<R, I, P>(
    auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
    Json(body): Json<UpdateAccountBody>,
) -> Result<StatusCode, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    if !password::meets_policy(&body.password) {
        return Err(ApiError::BadRequest(WEAK_PASSWORD_MESSAGE.to_string()));
    }

    let user = User {
        user_id: auth.user_id,
        name: body.name,
        email: body.email,
        password_hash: password::hash_password(&body.password),
    };
    if state.records.update_user(user).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("account".to_string()))
    }
}

/// `DELETE /v1/account`
pub async fn remove<R, I, P>(
    auth: AuthUser,
    State(state): State<GatewayState<R, I, P>>,
) -> Result<Json<DeleteResponse>, ApiError>
where
    R: Records + 'static,
    I: IdentityGateway + 'static,
    P: ProfileRegistry + 'static,
{
    let outcome = state.records.delete_user(&auth.user_id).await?;
    Ok(Json(DeleteResponse { outcome }))
}
