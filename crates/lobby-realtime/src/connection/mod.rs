//! Connection lifecycle: handles, registry, heartbeat, and sessions.

pub mod handle;
pub mod heartbeat;
pub mod registry;
pub mod session;

pub use handle::{ConnectionHandle, ConnectionId};
pub use heartbeat::{HeartbeatConfig, HeartbeatMonitor, LivenessTable, SweepReport};
pub use registry::ConnectionRegistry;
pub use session::{Frame, serve_connection};
