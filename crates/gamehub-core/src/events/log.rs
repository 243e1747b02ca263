//! Console/log line events.

use serde::{Deserialize, Serialize};

/// A raw line from the game server's console or log stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLine {
    /// The log line text.
    pub line: String,
}
