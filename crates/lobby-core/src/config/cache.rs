//! Session cache configuration.

use serde::{Deserialize, Serialize};

/// Authenticated-identity cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached identity record in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    /// Cron expression (with seconds) for the expired-entry sweep.
    #[serde(default = "default_sweep_schedule")]
    pub sweep_schedule: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: default_session_ttl(),
            sweep_schedule: default_sweep_schedule(),
        }
    }
}

fn default_session_ttl() -> u64 {
    30 * 60
}

fn default_sweep_schedule() -> String {
    "0 0 * * * *".to_string()
}
