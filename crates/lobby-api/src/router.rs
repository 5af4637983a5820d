//! Route definitions for the Lobby HTTP surface.
//!
//! `/ws` and `/health` are public; everything under `/api` sits behind the
//! bearer-token middleware.

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and per-route middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(user_routes()).route_layer(
        axum_middleware::from_fn_with_state(state.clone(), middleware::auth::require_auth),
    );

    Router::new()
        .route("/ws", get(handlers::ws::ws_upgrade))
        .route("/health", get(handlers::health::health))
        .nest("/api", api_routes)
        .fallback(handlers::fallback::route_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// User self-service endpoints
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(handlers::user::get_me))
}
