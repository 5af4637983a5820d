//! Per-connection delivery errors.

use thiserror::Error;

/// Why a message could not be queued for one connection.
///
/// Always handled by the caller that attempted the send (logged and
/// counted); one recipient's failure never affects another's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendFailure {
    /// The connection has been released or its writer is gone.
    #[error("connection closed")]
    Closed,
    /// The connection's outbound buffer is full.
    #[error("send buffer full")]
    BufferFull,
    /// The message could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for SendFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}
