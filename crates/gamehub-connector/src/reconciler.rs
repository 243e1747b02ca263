//! Periodic reconciliation of live connections against the control
//! plane's desired state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use gamehub_core::config::connector::ConnectorConfig;
use gamehub_core::traits::ControlPlaneClient;
use gamehub_core::types::id::{DomainId, GameServerId};

use crate::manager::GameServerManager;

/// Aligns the connection pool with the control plane.
///
/// Each pass lists the active domains and their servers, then diffs the
/// desired set (enabled, reachable, dialed kinds) against the registry:
/// missing servers are added, undesired ones removed. Self-registering
/// servers are exempt — the identify handshake owns their lifecycle.
#[derive(Debug)]
pub struct Reconciler {
    /// The lifecycle controller reconciliation drives.
    manager: Arc<GameServerManager>,
    /// Control-plane API client.
    control_plane: Arc<dyn ControlPlaneClient>,
    /// Time between passes.
    interval: Duration,
}

impl Reconciler {
    /// Create a reconciler from configuration.
    pub fn new(
        manager: Arc<GameServerManager>,
        control_plane: Arc<dyn ControlPlaneClient>,
        config: &ConnectorConfig,
    ) -> Self {
        Self {
            manager,
            control_plane,
            interval: Duration::from_secs(config.sync_interval_seconds),
        }
    }

    /// Run reconciliation passes until the cancel signal flips.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            interval_seconds = self.interval.as_secs(),
            "Reconciler started"
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
                    self.sync_once().await;
                }
            }
        }

        info!("Reconciler stopped");
    }

    /// One reconciliation pass.
    ///
    /// Never returns an error: a failure here would kill the periodic
    /// loop, so every fallible step is handled in place. One domain's
    /// fetch failure skips only that domain.
    pub async fn sync_once(&self) {
        let domains = match self.control_plane.list_active_domains().await {
            Ok(domains) => domains,
            Err(e) => {
                error!(error = %e, "Failed to list active domains, skipping sync pass");
                return;
            }
        };

        // Desired: every enabled+reachable dialed server of an active
        // domain. Domains whose server list could not be fetched are
        // excluded from the removal side of the diff below.
        let mut desired: HashMap<GameServerId, DomainId> = HashMap::new();
        let mut synced_domains: HashSet<DomainId> = HashSet::new();

        for domain in domains.iter().filter(|d| d.is_active()) {
            match self.control_plane.list_game_servers(domain.id).await {
                Ok(servers) => {
                    synced_domains.insert(domain.id);
                    for server in servers {
                        if server.enabled && server.reachable && !server.kind.self_registering() {
                            desired.insert(server.id, domain.id);
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        domain_id = %domain.id,
                        error = %e,
                        "Failed to list game servers, skipping domain this pass"
                    );
                }
            }
        }

        let registry = self.manager.registry();

        for (game_server_id, domain_id) in &desired {
            if !registry.contains(game_server_id) {
                debug!(
                    game_server_id = %game_server_id,
                    domain_id = %domain_id,
                    "Desired server not connected, adding"
                );
                self.manager.add(*domain_id, *game_server_id).await;
            }
        }

        for entry in registry.snapshot() {
            if entry.self_registering {
                continue;
            }
            if desired.contains_key(&entry.game_server_id) {
                continue;
            }
            // Only remove when this pass actually saw the owning domain's
            // server list; a failed fetch or inactive domain is not
            // evidence the server is gone.
            if !synced_domains.contains(&entry.domain_id) {
                continue;
            }

            info!(
                game_server_id = %entry.game_server_id,
                domain_id = %entry.domain_id,
                "Server no longer desired, disconnecting"
            );
            self.manager.remove(entry.game_server_id).await;
        }
    }
}
