//! Control-plane API client configuration.

use serde::{Deserialize, Serialize};

/// Control-plane API connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlPlaneConfig {
    /// Base URL of the control-plane API.
    pub base_url: String,
    /// Service token used to authenticate connector requests.
    pub api_token: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// How long to wait for the control plane to become healthy at startup.
    #[serde(default = "default_health_wait")]
    pub health_wait_seconds: u64,
}

fn default_request_timeout() -> u64 {
    10
}

fn default_health_wait() -> u64 {
    60
}
