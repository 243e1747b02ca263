//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod connector;
pub mod control_plane;
pub mod ingress;
pub mod logging;
pub mod queue;

use serde::{Deserialize, Serialize};

use self::connector::ConnectorConfig;
use self::control_plane::ControlPlaneConfig;
use self::ingress::IngressConfig;
use self::logging::LoggingConfig;
use self::queue::QueueConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Control-plane API settings.
    pub control_plane: ControlPlaneConfig,
    /// Connection manager settings.
    #[serde(default)]
    pub connector: ConnectorConfig,
    /// WebSocket ingress settings.
    #[serde(default)]
    pub ingress: IngressConfig,
    /// Outbound event queue settings.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `GAMEHUB__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GAMEHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
