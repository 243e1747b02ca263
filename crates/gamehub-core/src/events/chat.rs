//! Chat events.

use serde::{Deserialize, Serialize};

use super::player::PlayerRef;

/// The channel a chat message was sent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatChannel {
    /// Server-wide chat.
    Global,
    /// Team-only chat.
    Team,
    /// Direct message.
    Whisper,
}

/// A chat message observed on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The sending player. `None` for server-originated messages.
    #[serde(default)]
    pub player: Option<PlayerRef>,
    /// The channel the message was sent on.
    pub channel: ChatChannel,
    /// The message text.
    pub message: String,
}
