//! Catch-all for unknown routes.

use axum::Json;
use axum::http::StatusCode;

use crate::error::ApiErrorResponse;

/// Any unmatched path.
pub async fn route_not_found() -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorResponse::new("Route Not found")),
    )
}
