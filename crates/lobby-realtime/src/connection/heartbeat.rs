//! Hub-wide ping/pong liveness checking.
//!
//! One task serves every connection: each tick it evicts connections whose
//! last response is older than the liveness timeout and pings the rest.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lobby_core::config::RealtimeConfig;

use super::handle::ConnectionId;
use crate::hub::ConnectionHub;
use crate::message::builder;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Interval between sweeps
    pub ping_interval: Duration,
    /// Silence after which a connection is presumed dead
    pub liveness_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(15),
            liveness_timeout: Duration::from_secs(60),
        }
    }
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        if config.ping_interval_seconds == 0 || config.liveness_timeout_seconds == 0 {
            warn!(
                ping_interval_seconds = config.ping_interval_seconds,
                liveness_timeout_seconds = config.liveness_timeout_seconds,
                "Zero heartbeat timing raised to one second"
            );
        }
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds.max(1)),
            liveness_timeout: Duration::from_secs(config.liveness_timeout_seconds.max(1)),
        }
    }
}

/// Shortest period the monitor will tick at.
const MIN_PING_INTERVAL: Duration = Duration::from_millis(1);

/// Last time each connection was heard from.
///
/// Kept apart from the registry so a timestamp update never waits on a
/// registry read and vice versa.
#[derive(Debug, Default)]
pub struct LivenessTable {
    last_response: DashMap<ConnectionId, Instant>,
}

impl LivenessTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `id` as of now.
    pub fn record(&self, id: ConnectionId) {
        self.last_response.insert(id, Instant::now());
    }

    /// Refresh `id` if it is still tracked. Returns whether it was.
    pub fn touch(&self, id: &ConnectionId) -> bool {
        match self.last_response.get_mut(id) {
            Some(mut last) => {
                *last = Instant::now();
                true
            }
            None => false,
        }
    }

    /// When `id` last responded.
    pub fn last_response(&self, id: &ConnectionId) -> Option<Instant> {
        self.last_response.get(id).map(|entry| *entry.value())
    }

    /// Stop tracking `id`.
    pub fn forget(&self, id: &ConnectionId) {
        self.last_response.remove(id);
    }

    /// Number of tracked connections.
    pub fn len(&self) -> usize {
        self.last_response.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.last_response.is_empty()
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Connections that were sent a ping.
    pub pinged: usize,
    /// Connections released for exceeding the liveness timeout.
    pub evicted: usize,
    /// Pings that could not be queued.
    pub failed: usize,
}

/// Periodic liveness sweeper for a hub.
#[derive(Debug, Clone)]
pub struct HeartbeatMonitor {
    hub: Arc<ConnectionHub>,
    config: HeartbeatConfig,
}

impl HeartbeatMonitor {
    /// Create a monitor for `hub`.
    pub fn new(hub: Arc<ConnectionHub>, config: HeartbeatConfig) -> Self {
        Self { hub, config }
    }

    /// Inspect every registered connection once.
    pub fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let now = Instant::now();

        for handle in self.hub.registry().snapshot_all() {
            let Some(last) = self.hub.liveness().last_response(&handle.id) else {
                // Released between the snapshot and this check.
                continue;
            };

            let silent_for = now.saturating_duration_since(last);
            if silent_for > self.config.liveness_timeout {
                warn!(
                    conn_id = %handle.id,
                    user_id = %handle.user_id(),
                    silent_secs = silent_for.as_secs(),
                    "Connection unresponsive, evicting"
                );
                self.hub.release(&handle);
                report.evicted += 1;
                continue;
            }

            match handle.send(&builder::ping(handle.id)) {
                Ok(()) => report.pinged += 1,
                Err(e) => {
                    debug!(conn_id = %handle.id, error = %e, "Ping not queued");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Sweep every `ping_interval` until `shutdown` is cancelled.
    ///
    /// The first sweep happens one interval after start.
    pub async fn run(self, shutdown: CancellationToken) {
        let period = self.config.ping_interval.max(MIN_PING_INTERVAL);
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = period.as_secs(),
            timeout_secs = self.config.liveness_timeout.as_secs(),
            "Heartbeat monitor started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let report = self.sweep();
                    if report.evicted > 0 || report.failed > 0 {
                        info!(
                            pinged = report.pinged,
                            evicted = report.evicted,
                            failed = report.failed,
                            "Heartbeat sweep"
                        );
                    } else {
                        debug!(pinged = report.pinged, "Heartbeat sweep");
                    }
                }
            }
        }

        info!("Heartbeat monitor stopped");
    }
}
