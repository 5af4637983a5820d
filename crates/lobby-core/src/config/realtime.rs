//! Real-time WebSocket hub configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Interval between heartbeat sweeps in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Silence after which a connection is presumed dead, in seconds.
    #[serde(default = "default_liveness_timeout")]
    pub liveness_timeout_seconds: u64,
    /// Per-connection outbound buffer size.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Largest inbound text frame accepted for decoding.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            ping_interval_seconds: default_ping_interval(),
            liveness_timeout_seconds: default_liveness_timeout(),
            channel_buffer_size: default_channel_buffer(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

fn default_ping_interval() -> u64 {
    15
}

fn default_liveness_timeout() -> u64 {
    60
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_message_bytes() -> usize {
    65_536
}
