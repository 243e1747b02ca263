//! Outbound event queue configuration.

use serde::{Deserialize, Serialize};

/// Outbound event queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue provider: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis connection URL (redis provider only).
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Redis stream key events are appended to.
    #[serde(default = "default_stream_key")]
    pub stream_key: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis_url: default_redis_url(),
            stream_key: default_stream_key(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_stream_key() -> String {
    "gamehub:events".to_string()
}
