//! The identity capability consumed by request handling.

use async_trait::async_trait;
use vaxtrack_core::UserId;

use crate::error::Result;

/// A provider-issued user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    /// The stable user id the provider assigned.
    pub user_id: UserId,
}

/// Response from a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInResponse {
    /// The signed-in user.
    pub user_id: UserId,
    /// Bearer token for subsequent requests.
    pub access_token: String,
}

/// The external identity provider.
///
/// The provider owns credential authentication entirely: it issues the
/// stable user id at sign-up and resolves bearer tokens back to users. An
/// absent user is not an error — it means there is no valid session and the
/// caller must be asked to log in before any store access happens.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Register a new account; the provider issues the user id.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationFailed` if the provider rejects the sign-up,
    /// `RateLimited` on throttling, or `Internal` for transport failures.
    async fn sign_up(&self, email: &str, password: &str) -> Result<IdentityUser>;

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `LoginFailed` for invalid credentials, `RateLimited` on
    /// throttling, or `Internal` for transport failures.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse>;

    /// Resolve the current user for a bearer token.
    ///
    /// Returns `None` when the token is unknown, expired, or revoked.
    ///
    /// # Errors
    ///
    /// Returns an error only for provider or transport failures, never for
    /// a merely-absent session.
    async fn current_user(&self, token: &str) -> Result<Option<UserId>>;
}

/// A fixed identity for tests: every token resolves to the same user (or
/// to no user at all), and sign-up hands out that same user.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserId>,
}

#[cfg(any(test, feature = "test-utils"))]
impl StaticIdentity {
    /// Token handed out by [`StaticIdentity::sign_in`].
    pub const TOKEN: &'static str = "static-token";

    /// An identity that resolves every token to `user`.
    #[must_use]
    pub const fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    /// An identity with no session at all.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self { user: None }
    }

    /// An identity signed in as a freshly generated user.
    ///
    /// # Panics
    ///
    /// Never panics; generated ids are non-blank by construction.
    #[must_use]
    pub fn random_user() -> Self {
        let id = UserId::new(uuid::Uuid::new_v4().to_string()).expect("uuid ids are non-blank");
        Self::signed_in(id)
    }

    fn user(&self) -> Result<UserId> {
        self.user
            .clone()
            .ok_or_else(|| crate::AuthError::Internal("static identity has no user".to_string()))
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl IdentityGateway for StaticIdentity {
    async fn sign_up(&self, _email: &str, _password: &str) -> Result<IdentityUser> {
        Ok(IdentityUser {
            user_id: self.user()?,
        })
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<SignInResponse> {
        Ok(SignInResponse {
            user_id: self.user()?,
            access_token: Self::TOKEN.to_string(),
        })
    }

    async fn current_user(&self, _token: &str) -> Result<Option<UserId>> {
        Ok(self.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_identity_resolves_fixed_user() {
        let user = UserId::new("u1").unwrap();
        let identity = StaticIdentity::signed_in(user.clone());
        assert_eq!(identity.current_user("any").await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn signed_out_identity_resolves_nobody() {
        let identity = StaticIdentity::signed_out();
        assert_eq!(identity.current_user("any").await.unwrap(), None);
    }

    #[tokio::test]
    async fn static_sign_up_hands_out_the_fixed_user() {
        let user = UserId::new("u1").unwrap();
        let identity = StaticIdentity::signed_in(user.clone());
        assert_eq!(identity.sign_up("a@b.c", "p#ss1").await.unwrap().user_id, user);

        let session = identity.sign_in("a@b.c", "p#ss1").await.unwrap();
        assert_eq!(session.access_token, StaticIdentity::TOKEN);
    }
}
