//! Constructors for the envelopes the hub emits.

use serde_json::Value;

use lobby_entity::User;

use super::types::{Envelope, MessageKind};
use crate::connection::handle::ConnectionId;

/// Payload of the private greeting sent after authentication.
pub const WELCOME_PAYLOAD: &str = "Welcome to The WebSocket!";

/// Payload of the public notice broadcast when someone joins.
pub const USER_JOINED_PAYLOAD: &str = "A new user has connected!";

/// Authentication failure, carrying the reason.
pub fn auth_failure(reason: &str) -> Envelope {
    Envelope {
        kind: MessageKind::Connection,
        payload: Value::String(reason.to_string()),
        authorized: false,
        user: None,
    }
}

/// Private greeting to a newly authenticated connection.
pub fn welcome(user: &User) -> Envelope {
    Envelope {
        kind: MessageKind::Connection,
        payload: Value::String(WELCOME_PAYLOAD.to_string()),
        authorized: true,
        user: Some(user.clone()),
    }
}

/// Public notice that `user` has connected.
pub fn user_joined(user: &User) -> Envelope {
    Envelope {
        kind: MessageKind::Connection,
        payload: Value::String(USER_JOINED_PAYLOAD.to_string()),
        authorized: true,
        user: Some(user.clone()),
    }
}

/// Liveness check. The payload is the connection id so the client can
/// correlate its acknowledgment.
pub fn ping(conn_id: ConnectionId) -> Envelope {
    Envelope {
        kind: MessageKind::Ping,
        payload: Value::String(conn_id.to_string()),
        authorized: true,
        user: None,
    }
}
