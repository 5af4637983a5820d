//! Fan-out of one message to many connections.

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use crate::connection::handle::ConnectionHandle;
use crate::connection::registry::ConnectionRegistry;
use crate::message::types::Envelope;

/// Delivery counts for one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections in the snapshot.
    pub recipients: usize,
    /// Messages queued.
    pub delivered: usize,
    /// Messages that could not be queued.
    pub failed: usize,
}

/// Sends envelopes to registered connections.
///
/// Cheap to clone; any component holding one can publish.
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastBus {
    /// Creates a bus over `registry`.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Send to every connection registered at call time.
    pub fn broadcast(&self, envelope: &Envelope) -> BroadcastReport {
        self.fan_out(envelope, self.registry.snapshot_all())
    }

    /// Send to every connection of one identity.
    pub fn send_to_user(&self, identity: &Uuid, envelope: &Envelope) -> BroadcastReport {
        self.fan_out(envelope, self.registry.snapshot(identity))
    }

    fn fan_out(&self, envelope: &Envelope, targets: Vec<Arc<ConnectionHandle>>) -> BroadcastReport {
        let mut report = BroadcastReport {
            recipients: targets.len(),
            ..BroadcastReport::default()
        };
        if targets.is_empty() {
            return report;
        }

        let text: Arc<str> = match envelope.encode() {
            Ok(text) => Arc::from(text),
            Err(e) => {
                error!(kind = %envelope.kind, error = %e, "Failed to serialize broadcast message");
                report.failed = targets.len();
                return report;
            }
        };

        for handle in &targets {
            match handle.send_text(Arc::clone(&text)) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    debug!(conn_id = %handle.id, error = %e, "Broadcast not delivered");
                    report.failed += 1;
                }
            }
        }

        report
    }
}
