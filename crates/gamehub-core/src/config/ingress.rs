//! WebSocket ingress configuration.

use serde::{Deserialize, Serialize};

/// WebSocket ingress configuration for self-registering servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressConfig {
    /// Socket address the ingress listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Interval in seconds between server-initiated pings.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:3004".to_string()
}

fn default_heartbeat_interval() -> u64 {
    30
}
