//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Crate version.
    pub app_version: String,
    /// Live WebSocket connections.
    pub connections: usize,
    /// Identities with at least one live connection.
    pub users_online: usize,
    /// Whether the identity store answered.
    pub database_alive: bool,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_alive = match state.identities.health_check().await {
        Ok(alive) => alive,
        Err(e) => {
            warn!(error = %e, "Identity store health check failed");
            false
        }
    };

    Json(HealthResponse {
        uptime_seconds: state.started_at.elapsed().as_secs(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        connections: state.realtime.connection_count(),
        users_online: state.realtime.user_count(),
        database_alive,
    })
}
