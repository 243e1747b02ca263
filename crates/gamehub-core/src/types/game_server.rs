//! Game server models as reported by the control plane.

use serde::{Deserialize, Serialize};

use super::id::GameServerId;

/// The protocol family of a game server.
///
/// This is a closed set: the connector only knows how to speak to the
/// kinds listed here. Capability checks (notably [`self_registering`])
/// live on this enum so that no other component branches on the kind.
///
/// [`self_registering`]: GameServerKind::self_registering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameServerKind {
    /// Rust dedicated server (websocket RCON).
    Rust,
    /// 7 Days to Die dedicated server.
    SevenDaysToDie,
    /// A self-registering server that dials into the connector's
    /// websocket ingress and identifies itself with a token.
    Generic,
}

impl GameServerKind {
    /// Whether servers of this kind register themselves via the identify
    /// handshake instead of being dialed by the connector.
    ///
    /// Reported reachability is meaningless for self-registering servers
    /// until they have identified, so connection gating and reconciliation
    /// both skip the reachability policy for them.
    pub fn self_registering(&self) -> bool {
        matches!(self, Self::Generic)
    }
}

/// Full game server details fetched from the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameServerDetails {
    /// The server identifier.
    pub id: GameServerId,
    /// Human-readable server name.
    pub name: String,
    /// Protocol family.
    pub kind: GameServerKind,
    /// Opaque, kind-specific connection info (host/port/credentials).
    #[serde(default)]
    pub connection_info: serde_json::Value,
    /// Identity token for self-registering servers.
    #[serde(default)]
    pub identity_token: Option<String>,
    /// Whether the server is enabled by its owner.
    pub enabled: bool,
    /// Whether the control plane's last health probe succeeded.
    pub reachable: bool,
}

/// Request body for registering a new game server with the control plane.
///
/// Only used by the identify handshake, which creates self-registering
/// servers on first contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameServer {
    /// Human-readable server name.
    pub name: String,
    /// Protocol family.
    pub kind: GameServerKind,
    /// Identity token presented during the handshake.
    pub identity_token: String,
    /// Opaque connection info.
    pub connection_info: serde_json::Value,
}
