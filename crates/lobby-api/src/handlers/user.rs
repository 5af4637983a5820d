//! User self-service handlers.

use axum::Json;
use serde::Serialize;

use lobby_entity::User;

use crate::extractors::AuthUser;

/// Body of `GET /api/users/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The caller's identity record.
    pub user: User,
}

/// GET /api/users/me
pub async fn get_me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        status: "success",
        user,
    })
}
