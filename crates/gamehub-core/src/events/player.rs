//! Player session events.

use serde::{Deserialize, Serialize};

/// Reference to a player as known by the game server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRef {
    /// The player's identifier inside the game.
    pub game_id: String,
    /// Display name.
    pub name: String,
    /// Platform identifier (Steam ID, Epic ID, ...) when the game
    /// exposes one.
    #[serde(default)]
    pub platform_id: Option<String>,
}

/// A player joined the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConnected {
    /// The joining player.
    pub player: PlayerRef,
}

/// A player left the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDisconnected {
    /// The leaving player.
    pub player: PlayerRef,
}
