//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use lobby_auth::IdentityResolver;
use lobby_core::config::AppConfig;
use lobby_database::{IdentityStore, RequestLogRepository};
use lobby_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Credential → identity resolution (shared with the hub)
    pub resolver: Arc<IdentityResolver>,
    /// WebSocket realtime engine
    pub realtime: RealtimeEngine,
    /// Identity store, for health reporting
    pub identities: Arc<dyn IdentityStore>,
    /// Request log sink; `None` keeps request logging in tracing only
    pub request_logs: Option<RequestLogRepository>,
    /// Process start, for uptime
    pub started_at: Instant,
}

impl AppState {
    /// Assemble state; uptime is counted from this call.
    pub fn new(
        config: Arc<AppConfig>,
        resolver: Arc<IdentityResolver>,
        realtime: RealtimeEngine,
        identities: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            config,
            resolver,
            realtime,
            identities,
            request_logs: None,
            started_at: Instant::now(),
        }
    }

    /// Persist every HTTP exchange through `repo`.
    pub fn with_request_logs(mut self, repo: RequestLogRepository) -> Self {
        self.request_logs = Some(repo);
        self
    }
}
