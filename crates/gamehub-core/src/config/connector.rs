//! Connection manager configuration.

use serde::{Deserialize, Serialize};

/// Connection manager configuration.
///
/// The staleness threshold must exceed the quiet period of a healthy
/// connection (e.g. the game server's heartbeat interval), otherwise the
/// watchdog produces false positives and reconnects healthy servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Interval in seconds between reconciliation passes.
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,
    /// Interval in seconds between watchdog scans.
    #[serde(default = "default_watchdog_interval")]
    pub watchdog_interval_seconds: u64,
    /// Seconds of silence after which a connection is considered stale.
    #[serde(default = "default_staleness_threshold")]
    pub staleness_threshold_seconds: u64,
    /// Buffer size for per-connection event channels.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            sync_interval_seconds: default_sync_interval(),
            watchdog_interval_seconds: default_watchdog_interval(),
            staleness_threshold_seconds: default_staleness_threshold(),
            event_buffer_size: default_event_buffer(),
        }
    }
}

fn default_sync_interval() -> u64 {
    60
}

fn default_watchdog_interval() -> u64 {
    30
}

fn default_staleness_threshold() -> u64 {
    60
}

fn default_event_buffer() -> usize {
    256
}
