//! The JSON envelope exchanged in both directions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lobby_entity::User;

/// Value of the envelope's `type` field.
///
/// Unrecognized values are kept verbatim in [`MessageKind::Other`] so that
/// newer clients can send kinds this server does not handle yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    /// Authentication result or peer join notice.
    Connection,
    /// Server liveness check.
    Ping,
    /// Client liveness acknowledgment.
    Pong,
    /// Application message.
    Message,
    /// Anything else.
    Other(String),
}

impl MessageKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connection => "connection",
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Message => "message",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for MessageKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "connection" => Self::Connection,
            "ping" => Self::Ping,
            "pong" => Self::Pong,
            "message" => Self::Message,
            _ => Self::Other(value),
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{"type": .., "payload": .., "authorized": .., "user": ..}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message kind.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Opaque payload.
    #[serde(default)]
    pub payload: Value,
    /// Whether the connection is authenticated.
    #[serde(default)]
    pub authorized: bool,
    /// Identity snapshot, serialized as `null` when absent.
    #[serde(default)]
    pub user: Option<User>,
}

impl Envelope {
    /// Encode to the wire text form.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the wire text form.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
