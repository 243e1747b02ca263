//! Combat events.

use serde::{Deserialize, Serialize};

use super::player::PlayerRef;

/// World position where a combat event happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A player died.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDeath {
    /// The player who died.
    pub player: PlayerRef,
    /// The attacker, when the game attributes the death to one.
    #[serde(default)]
    pub attacker: Option<PlayerRef>,
    /// Where the death happened, when the game reports it.
    #[serde(default)]
    pub position: Option<Position>,
}

/// A player killed a non-player entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityKilled {
    /// The player who made the kill.
    pub player: PlayerRef,
    /// The entity that was killed (game-specific name).
    pub entity: String,
    /// The weapon used, when the game reports it.
    #[serde(default)]
    pub weapon: Option<String>,
}
