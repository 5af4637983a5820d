//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the cron scheduler is started.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for pruning `request_logs`.
    #[serde(default = "default_request_log_cleanup_schedule")]
    pub request_log_cleanup_schedule: String,
    /// Request log rows older than this many days are deleted.
    #[serde(default = "default_request_log_retention_days")]
    pub request_log_retention_days: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            request_log_cleanup_schedule: default_request_log_cleanup_schedule(),
            request_log_retention_days: default_request_log_retention_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_request_log_cleanup_schedule() -> String {
    "0 0 0 * * *".to_string()
}

fn default_request_log_retention_days() -> u32 {
    30
}
