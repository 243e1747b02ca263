//! Game events observed on live game-server connections.
//!
//! Events are decoded by the protocol adapters, multiplexed through the
//! connection manager, and enqueued for downstream processing (module
//! triggers, statistics, chat bridges).
//!
//! [`GameEvent`] is a closed union: adding a new event kind is a
//! compile-time exhaustiveness change in the forwarder's dispatch, not a
//! string to remember in multiple places.

pub mod chat;
pub mod combat;
pub mod log;
pub mod player;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use chat::{ChatChannel, ChatMessage};
pub use combat::{EntityKilled, PlayerDeath};
pub use log::LogLine;
pub use player::{PlayerConnected, PlayerDisconnected, PlayerRef};

use crate::types::id::{DomainId, GameServerId};

/// Union of all game event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum GameEvent {
    /// A raw console/log line.
    LogLine(LogLine),
    /// A player joined the server.
    PlayerConnected(PlayerConnected),
    /// A player left the server.
    PlayerDisconnected(PlayerDisconnected),
    /// A chat message was sent.
    ChatMessage(ChatMessage),
    /// A player died.
    PlayerDeath(PlayerDeath),
    /// A player killed a non-player entity.
    EntityKilled(EntityKilled),
}

impl GameEvent {
    /// The discriminant of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LogLine(_) => EventKind::LogLine,
            Self::PlayerConnected(_) => EventKind::PlayerConnected,
            Self::PlayerDisconnected(_) => EventKind::PlayerDisconnected,
            Self::ChatMessage(_) => EventKind::ChatMessage,
            Self::PlayerDeath(_) => EventKind::PlayerDeath,
            Self::EntityKilled(_) => EventKind::EntityKilled,
        }
    }
}

/// Discriminant-only view of [`GameEvent`], used for routing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// A raw console/log line.
    LogLine,
    /// A player joined the server.
    PlayerConnected,
    /// A player left the server.
    PlayerDisconnected,
    /// A chat message was sent.
    ChatMessage,
    /// A player died.
    PlayerDeath,
    /// A player killed a non-player entity.
    EntityKilled,
}

impl EventKind {
    /// All event kinds, in declaration order.
    pub const ALL: [EventKind; 6] = [
        EventKind::LogLine,
        EventKind::PlayerConnected,
        EventKind::PlayerDisconnected,
        EventKind::ChatMessage,
        EventKind::PlayerDeath,
        EventKind::EntityKilled,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogLine => write!(f, "log-line"),
            Self::PlayerConnected => write!(f, "player-connected"),
            Self::PlayerDisconnected => write!(f, "player-disconnected"),
            Self::ChatMessage => write!(f, "chat-message"),
            Self::PlayerDeath => write!(f, "player-death"),
            Self::EntityKilled => write!(f, "entity-killed"),
        }
    }
}

/// Envelope written to the outbound queue for every forwarded event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// The event discriminant, duplicated for cheap consumer-side routing.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// The event payload.
    pub event: GameEvent,
    /// The domain that owns the originating server.
    pub domain_id: DomainId,
    /// The originating server.
    pub game_server_id: GameServerId,
    /// When the connector observed the event.
    pub observed_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Create an envelope for an event observed now.
    pub fn new(domain_id: DomainId, game_server_id: GameServerId, event: GameEvent) -> Self {
        Self {
            kind: event.kind(),
            event,
            domain_id,
            game_server_id,
            observed_at: Utc::now(),
        }
    }
}
