//! Connection lifecycle controller.
//!
//! Owns every mutation of the [`ConnectionRegistry`]. `add`, `remove`,
//! and `update` are designed to be fire-and-forget from API request
//! handlers: failures are caught and logged here, never propagated.

use std::sync::atomic::AtomicI64;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use gamehub_core::error::AppError;
use gamehub_core::result::AppResult;
use gamehub_core::traits::{AdapterFactory, ControlPlaneClient, EventQueue};
use gamehub_core::types::game_server::{CreateGameServer, GameServerKind};
use gamehub_core::types::id::{DomainId, GameServerId};

use crate::forwarder::spawn_forwarder;
use crate::registry::{ConnectionRecord, ConnectionRegistry};

/// Manages the live pool of game-server connections.
///
/// Constructed once at startup and shared by reference; collaborators are
/// injected so the manager can be exercised against mocks and sharded by
/// domain in multi-instance deployments.
#[derive(Debug)]
pub struct GameServerManager {
    /// The connection registry. Only this type mutates it.
    registry: Arc<ConnectionRegistry>,
    /// Control-plane API client.
    control_plane: Arc<dyn ControlPlaneClient>,
    /// Protocol adapter factory.
    adapters: Arc<dyn AdapterFactory>,
    /// Outbound event queue.
    queue: Arc<dyn EventQueue>,
}

impl GameServerManager {
    /// Create a manager over an empty registry.
    pub fn new(
        control_plane: Arc<dyn ControlPlaneClient>,
        adapters: Arc<dyn AdapterFactory>,
        queue: Arc<dyn EventQueue>,
    ) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            control_plane,
            adapters,
            queue,
        }
    }

    /// Read access to the registry for the reconciler and watchdog.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Connect a game server and start forwarding its events.
    ///
    /// Respects the policy gates: disabled servers are never connected,
    /// and unreachable servers are only connected when their kind is
    /// self-registering. Safe to call for an already-connected id — the
    /// existing connection is torn down first.
    pub async fn add(&self, domain_id: DomainId, game_server_id: GameServerId) {
        if let Err(e) = self.connect(domain_id, game_server_id, true).await {
            warn!(
                game_server_id = %game_server_id,
                domain_id = %domain_id,
                error = %e,
                "Failed to add game server"
            );
        }
    }

    /// Disconnect a game server and forget it.
    ///
    /// A no-op when the id is not connected.
    pub async fn remove(&self, game_server_id: GameServerId) {
        match self.registry.remove(&game_server_id) {
            Some(record) => {
                self.teardown(game_server_id, record).await;
                info!(game_server_id = %game_server_id, "Removed game server");
            }
            None => {
                debug!(
                    game_server_id = %game_server_id,
                    "Remove requested for a game server that is not connected"
                );
            }
        }
    }

    /// Reconnect a game server after its connection info changed.
    pub async fn update(&self, domain_id: DomainId, game_server_id: GameServerId) {
        self.remove(game_server_id).await;
        self.add(domain_id, game_server_id).await;
    }

    /// Force a reconnect, ignoring the control plane's reachability flag.
    ///
    /// Used by the watchdog: a server reporting itself reachable while
    /// staying silent is exactly the failure the staleness check repairs,
    /// so the reported flag must not veto the reconnect.
    pub(crate) async fn force_reconnect(&self, domain_id: DomainId, game_server_id: GameServerId) {
        self.remove(game_server_id).await;
        if let Err(e) = self.connect(domain_id, game_server_id, false).await {
            warn!(
                game_server_id = %game_server_id,
                domain_id = %domain_id,
                error = %e,
                "Forced reconnect failed"
            );
        }
    }

    /// Identify handshake for self-registering servers.
    ///
    /// Resolves the domain from the registration token, finds or creates
    /// the server record for the identity token, connects it, and returns
    /// its id. Idempotent: repeated identifies with the same identity
    /// token resolve to the same server.
    pub async fn handle_identify(
        &self,
        identity_token: &str,
        registration_token: &str,
        name: Option<&str>,
    ) -> AppResult<GameServerId> {
        let domain = self
            .control_plane
            .resolve_registration_token(registration_token)
            .await?
            .ok_or_else(|| AppError::not_found("Unknown registration token"))?;

        let details = match self
            .control_plane
            .find_game_server_by_identity(domain.id, identity_token)
            .await?
        {
            Some(existing) => existing,
            None => {
                let request = CreateGameServer {
                    name: name.unwrap_or(identity_token).to_string(),
                    kind: GameServerKind::Generic,
                    identity_token: identity_token.to_string(),
                    connection_info: serde_json::json!({ "identity_token": identity_token }),
                };
                self.control_plane
                    .create_game_server(domain.id, request)
                    .await?
            }
        };

        info!(
            game_server_id = %details.id,
            domain_id = %domain.id,
            "Game server identified"
        );

        self.add(domain.id, details.id).await;
        Ok(details.id)
    }

    /// Disconnect everything. Used during shutdown.
    pub async fn remove_all(&self) {
        for entry in self.registry.snapshot() {
            self.remove(entry.game_server_id).await;
        }
    }

    async fn connect(
        &self,
        domain_id: DomainId,
        game_server_id: GameServerId,
        honor_reachability: bool,
    ) -> AppResult<()> {
        let details = self
            .control_plane
            .get_game_server(domain_id, game_server_id)
            .await?;

        if !details.enabled {
            debug!(game_server_id = %game_server_id, "Server is disabled, not connecting");
            return Ok(());
        }

        // Reachability is meaningless for self-registering servers until
        // they identify, so only dialed kinds are gated on it.
        if honor_reachability && !details.reachable && !details.kind.self_registering() {
            debug!(game_server_id = %game_server_id, "Server is unreachable, not connecting");
            return Ok(());
        }

        // Idempotent re-add: drop any live connection before dialing anew.
        if let Some(existing) = self.registry.remove(&game_server_id) {
            info!(
                game_server_id = %game_server_id,
                "Already connected, tearing down before re-add"
            );
            self.teardown(game_server_id, existing).await;
        }

        let stream = self
            .adapters
            .create(details.kind, &details.connection_info, game_server_id)
            .await?;
        stream.start().await?;

        let events = stream.subscribe();
        let last_event_at = Arc::new(AtomicI64::new(Utc::now().timestamp_millis()));
        let forwarder = spawn_forwarder(
            domain_id,
            game_server_id,
            last_event_at.clone(),
            self.queue.clone(),
            events,
        );

        let record = ConnectionRecord::new(
            domain_id,
            details.kind.self_registering(),
            stream,
            last_event_at,
            forwarder,
        );

        // Single-map write, with no await between here and the insert: the
        // registry can never hold partial state for this id. A racing
        // connect for the same id may have landed first; stopping the
        // displaced record converges to exactly one live connection.
        if let Some(displaced) = self.registry.insert(game_server_id, record) {
            self.teardown(game_server_id, displaced).await;
        }

        info!(
            game_server_id = %game_server_id,
            domain_id = %domain_id,
            kind = ?details.kind,
            "Game server connected"
        );
        Ok(())
    }

    /// Stop a record's stream and forwarder. Best-effort: a misbehaving
    /// adapter must not block registry cleanup.
    async fn teardown(&self, game_server_id: GameServerId, record: ConnectionRecord) {
        if let Err(e) = record.stream().stop().await {
            warn!(
                game_server_id = %game_server_id,
                error = %e,
                "Failed to stop event stream"
            );
        }
        record.abort_forwarder();
    }
}
