//! Individual WebSocket connection handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use uuid::Uuid;

use lobby_entity::User;

use crate::error::SendFailure;
use crate::message::types::Envelope;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A handle to a single authenticated connection.
///
/// Owned by its session (and the session's writer task); the registry only
/// keeps weak references. Outbound text goes through a bounded channel that
/// the writer task drains into the transport.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Identity snapshot taken at authentication
    pub user: User,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Sender for encoded outbound messages
    sender: mpsc::Sender<Arc<str>>,
    /// Cancelled once the connection is closed
    closed: CancellationToken,
    /// Set by the first (and only) release
    released: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(user: User, sender: mpsc::Sender<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            connected_at: Utc::now(),
            sender,
            closed: CancellationToken::new(),
            released: AtomicBool::new(false),
        }
    }

    /// Identity this connection authenticated as
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Encode and queue an envelope.
    pub fn send(&self, envelope: &Envelope) -> Result<(), SendFailure> {
        let text = envelope.encode()?;
        self.send_text(Arc::from(text))
    }

    /// Queue already-encoded text without waiting.
    pub fn send_text(&self, text: Arc<str>) -> Result<(), SendFailure> {
        if self.is_closed() {
            return Err(SendFailure::Closed);
        }
        match self.sender.try_send(text) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SendFailure::BufferFull),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                Err(SendFailure::Closed)
            }
        }
    }

    /// Signal the session and writer to stop. Idempotent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Whether the connection has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once the connection is closed.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.closed.cancelled()
    }

    /// Returns `true` exactly once, for the caller that gets to run cleanup.
    pub(crate) fn mark_released(&self) -> bool {
        !self.released.swap(true, Ordering::AcqRel)
    }
}
