//! Top-level real-time engine that owns the hub and its heartbeat task.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use lobby_auth::IdentityResolver;
use lobby_core::config::RealtimeConfig;

use crate::broadcast::BroadcastBus;
use crate::connection::heartbeat::HeartbeatMonitor;
use crate::hub::{ConnectionHub, HubSettings};

/// Central real-time engine.
///
/// Cloning is cheap; every clone shares the same hub and shutdown token.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Shared connection state.
    pub hub: Arc<ConnectionHub>,
    /// Cancels the heartbeat task.
    shutdown: CancellationToken,
}

impl RealtimeEngine {
    /// Creates the engine from configuration and starts the heartbeat.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &RealtimeConfig, resolver: Arc<IdentityResolver>) -> Self {
        Self::with_settings(HubSettings::from(config), resolver)
    }

    /// Creates the engine with explicit settings and starts the heartbeat.
    pub fn with_settings(settings: HubSettings, resolver: Arc<IdentityResolver>) -> Self {
        let hub = Arc::new(ConnectionHub::new(resolver, settings));
        let shutdown = CancellationToken::new();

        let monitor = HeartbeatMonitor::new(Arc::clone(&hub), settings.heartbeat);
        tokio::spawn(monitor.run(shutdown.child_token()));

        info!(
            ping_interval_secs = settings.heartbeat.ping_interval.as_secs(),
            liveness_timeout_secs = settings.heartbeat.liveness_timeout.as_secs(),
            channel_buffer_size = settings.channel_buffer_size,
            "Real-time engine initialized"
        );

        Self { hub, shutdown }
    }

    /// The broadcast bus, for producers outside the hub.
    pub fn bus(&self) -> &BroadcastBus {
        self.hub.bus()
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.hub.registry().connection_count()
    }

    /// Number of identities with at least one live connection.
    pub fn user_count(&self) -> usize {
        self.hub.registry().user_count()
    }

    /// Whether the engine has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stops the heartbeat and closes every connection.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.shutdown.cancel();
        let closed = self.hub.close_all();
        info!(closed, "Real-time engine shut down");
    }
}
