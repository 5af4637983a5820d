//! Bearer-token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use lobby_auth::{AuthFailure, bearer_token};
use lobby_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::extractors::auth::NOT_LOGGED_IN;
use crate::middleware::logging::LoggedUser;
use crate::state::AppState;

/// Resolves the `Authorization: Bearer` credential and stores the caller as
/// an [`AuthUser`] extension. Lookups go through the shared session cache.
/// The caller id is also left on the response for the request log.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);

    let user = state
        .resolver
        .resolve(credential)
        .await
        .map_err(http_failure)?;
    let caller = LoggedUser(user.id);
    request.extensions_mut().insert(AuthUser(user));

    let mut response = next.run(request).await;
    response.extensions_mut().insert(caller);
    Ok(response)
}

/// HTTP wording differs from the socket's for an absent credential.
fn http_failure(failure: AuthFailure) -> ApiError {
    match failure {
        AuthFailure::MissingCredential => AppError::authentication(NOT_LOGGED_IN).into(),
        other => other.into(),
    }
}
