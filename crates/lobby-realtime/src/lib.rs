//! # lobby-realtime
//!
//! Real-time WebSocket hub for Lobby. Provides:
//!
//! - Authenticated connection sessions over any frame stream / text sink
//! - A per-identity connection registry with snapshot iteration
//! - A hub-wide heartbeat that pings and evicts unresponsive connections
//! - Broadcast to every connection, or to every connection of one identity

pub mod broadcast;
pub mod connection;
pub mod error;
pub mod hub;
pub mod message;
pub mod server;

pub use broadcast::{BroadcastBus, BroadcastReport};
pub use connection::{ConnectionHandle, ConnectionRegistry, Frame, serve_connection};
pub use error::SendFailure;
pub use hub::{ConnectionHub, HubSettings};
pub use message::{Envelope, MessageKind};
pub use server::RealtimeEngine;
