//! Control-plane client trait.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::domain::DomainInfo;
use crate::types::game_server::{CreateGameServer, GameServerDetails};
use crate::types::id::{DomainId, GameServerId};

/// Client for the control-plane API that owns domain and game-server
/// records.
///
/// Lookups that the contract treats as "absence, not failure" return
/// `Ok(None)`; everything else maps transport and status errors into
/// [`crate::error::ErrorKind::ControlPlane`].
#[async_trait]
pub trait ControlPlaneClient: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch full details for one game server within a domain.
    async fn get_game_server(
        &self,
        domain_id: DomainId,
        game_server_id: GameServerId,
    ) -> AppResult<GameServerDetails>;

    /// List all game servers registered in a domain.
    async fn list_game_servers(&self, domain_id: DomainId) -> AppResult<Vec<GameServerDetails>>;

    /// List all domains currently in the active state.
    async fn list_active_domains(&self) -> AppResult<Vec<DomainInfo>>;

    /// Resolve a registration token to its domain.
    ///
    /// Returns `Ok(None)` for unknown tokens.
    async fn resolve_registration_token(&self, token: &str) -> AppResult<Option<DomainInfo>>;

    /// Find a self-registering game server by its identity token.
    ///
    /// Returns `Ok(None)` when no server in the domain carries the token.
    async fn find_game_server_by_identity(
        &self,
        domain_id: DomainId,
        identity_token: &str,
    ) -> AppResult<Option<GameServerDetails>>;

    /// Register a new game server in a domain.
    async fn create_game_server(
        &self,
        domain_id: DomainId,
        request: CreateGameServer,
    ) -> AppResult<GameServerDetails>;

    /// Block until the control plane answers its health probe, or the
    /// timeout elapses.
    async fn wait_until_healthy(&self, timeout: Duration) -> AppResult<()>;
}
