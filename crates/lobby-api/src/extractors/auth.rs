//! `AuthUser` extractor: the identity the auth middleware resolved.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lobby_core::error::AppError;
use lobby_entity::User;

use crate::error::ApiError;

/// Rejection text when no caller is attached to the request.
pub const NOT_LOGGED_IN: &str = "You are not logged in";

/// Authenticated caller, available in handlers behind `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl std::ops::Deref for AuthUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::authentication(NOT_LOGGED_IN).into())
    }
}
