//! The connection hub: shared state for every session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use lobby_auth::IdentityResolver;
use lobby_core::config::RealtimeConfig;
use lobby_entity::User;

use crate::broadcast::BroadcastBus;
use crate::connection::handle::ConnectionHandle;
use crate::connection::heartbeat::{HeartbeatConfig, LivenessTable};
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::{Envelope, MessageKind};
use crate::message::validator::{self, MAX_MESSAGE_SIZE};

/// Runtime tuning for a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubSettings {
    /// Heartbeat timings.
    pub heartbeat: HeartbeatConfig,
    /// Outbound queue depth per connection.
    pub channel_buffer_size: usize,
    /// Largest inbound text frame that will be decoded.
    pub max_message_bytes: usize,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            heartbeat: HeartbeatConfig::default(),
            channel_buffer_size: 256,
            max_message_bytes: MAX_MESSAGE_SIZE,
        }
    }
}

impl From<&RealtimeConfig> for HubSettings {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            heartbeat: HeartbeatConfig::from(config),
            channel_buffer_size: config.channel_buffer_size.max(1),
            max_message_bytes: config.max_message_bytes,
        }
    }
}

/// Registry, liveness table, broadcast bus, and authenticator shared by
/// all connection sessions and the heartbeat monitor.
#[derive(Debug)]
pub struct ConnectionHub {
    registry: Arc<ConnectionRegistry>,
    liveness: LivenessTable,
    bus: BroadcastBus,
    resolver: Arc<IdentityResolver>,
    settings: HubSettings,
}

impl ConnectionHub {
    /// Creates a hub with no connections.
    pub fn new(resolver: Arc<IdentityResolver>, settings: HubSettings) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            bus: BroadcastBus::new(Arc::clone(&registry)),
            registry,
            liveness: LivenessTable::new(),
            resolver,
            settings,
        }
    }

    /// The connection registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Last-response timestamps.
    pub fn liveness(&self) -> &LivenessTable {
        &self.liveness
    }

    /// The broadcast bus.
    pub fn bus(&self) -> &BroadcastBus {
        &self.bus
    }

    /// The authenticator sessions use.
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Hub settings.
    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    /// Register a new connection for an authenticated `user` and start
    /// tracking its liveness.
    ///
    /// Returns the handle and the receiving end of its outbound queue.
    pub fn admit(&self, user: User) -> (Arc<ConnectionHandle>, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(self.settings.channel_buffer_size);
        let identity = user.id;
        let handle = Arc::new(ConnectionHandle::new(user, tx));

        self.registry.register(identity, &handle);
        self.liveness.record(handle.id);

        info!(
            conn_id = %handle.id,
            user_id = %identity,
            username = %handle.user.username,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Close a connection and drop all hub state for it.
    ///
    /// Only the first call for a handle does anything; later calls (from
    /// the session exit after a heartbeat eviction, say) return `false`.
    pub fn release(&self, handle: &ConnectionHandle) -> bool {
        if !handle.mark_released() {
            return false;
        }

        handle.close();
        self.registry.unregister(handle.user_id(), handle);
        self.liveness.forget(&handle.id);

        info!(
            conn_id = %handle.id,
            user_id = %handle.user_id(),
            "WebSocket connection unregistered"
        );
        true
    }

    /// Process one inbound text frame.
    ///
    /// Oversized, blank, or undecodable text is logged and skipped; the
    /// session continues either way. Returns the decoded kind.
    pub fn dispatch(&self, handle: &ConnectionHandle, raw: &str) -> Option<MessageKind> {
        if let Err(e) = validator::validate_inbound(raw, self.settings.max_message_bytes) {
            debug!(conn_id = %handle.id, error = %e, "Discarding inbound message");
            return None;
        }

        let envelope = match Envelope::decode(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(conn_id = %handle.id, error = %e, "Discarding undecodable message");
                return None;
            }
        };

        match &envelope.kind {
            MessageKind::Pong => {
                self.liveness.touch(&handle.id);
            }
            other => {
                debug!(conn_id = %handle.id, kind = %other, "No handler for message kind");
            }
        }

        Some(envelope.kind)
    }

    /// Release every registered connection. Returns how many were released.
    pub fn close_all(&self) -> usize {
        let released = self
            .registry
            .snapshot_all()
            .iter()
            .filter(|handle| self.release(handle))
            .count();
        info!(count = released, "All connections closed");
        released
    }
}
