//! Liveness watchdog — detects stale connections and forces reconnects.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::{info, warn};

use gamehub_core::config::connector::ConnectorConfig;

use crate::manager::GameServerManager;

/// Scans the registry for connections that have gone silent.
///
/// Staleness is used as a connection-health proxy that is independent of
/// the control plane's reported reachability: a stale connection is
/// reconnected even when the control plane currently reports the server
/// as unreachable. The scan interval should be shorter than the
/// staleness threshold so a stale connection is caught within one
/// threshold window.
#[derive(Debug)]
pub struct Watchdog {
    /// The lifecycle controller reconnects go through.
    manager: Arc<GameServerManager>,
    /// Time between scans.
    interval: Duration,
    /// Silence longer than this marks a connection stale.
    staleness_threshold: chrono::Duration,
}

impl Watchdog {
    /// Create a watchdog from configuration.
    pub fn new(manager: Arc<GameServerManager>, config: &ConnectorConfig) -> Self {
        Self {
            manager,
            interval: Duration::from_secs(config.watchdog_interval_seconds),
            staleness_threshold: chrono::Duration::seconds(
                config.staleness_threshold_seconds as i64,
            ),
        }
    }

    /// Run watchdog scans until the cancel signal flips.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            interval_seconds = self.interval.as_secs(),
            threshold_seconds = self.staleness_threshold.num_seconds(),
            "Watchdog started"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.check_once().await;
                }
            }
        }

        info!("Watchdog stopped");
    }

    /// One scan over the registry.
    pub async fn check_once(&self) {
        let now = Utc::now();

        for entry in self.manager.registry().snapshot() {
            let silent_for = now - entry.last_event_at;
            if silent_for <= self.staleness_threshold {
                continue;
            }

            warn!(
                game_server_id = %entry.game_server_id,
                domain_id = %entry.domain_id,
                silent_seconds = silent_for.num_seconds(),
                "No events within staleness threshold, forcing reconnect"
            );

            self.manager
                .force_reconnect(entry.domain_id, entry.game_server_id)
                .await;
        }
    }
}
