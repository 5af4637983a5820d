//! WebSocket wire protocol.

pub mod builder;
pub mod types;
pub mod validator;

pub use types::{Envelope, MessageKind};
