//! Adapter construction by server kind.

use std::sync::Arc;

use async_trait::async_trait;

use gamehub_core::error::AppError;
use gamehub_core::result::AppResult;
use gamehub_core::traits::{AdapterFactory, EventStream};
use gamehub_core::types::game_server::GameServerKind;
use gamehub_core::types::id::GameServerId;

use crate::generic::{GenericAdapter, GenericEventHub};
use crate::ws::{WsAdapter, WsConnectionInfo};

/// Default [`AdapterFactory`] covering every known server kind.
#[derive(Debug)]
pub struct GameAdapterFactory {
    /// Hub the ingress publishes self-registering servers' events into.
    hub: Arc<GenericEventHub>,
    /// Buffer size for adapter event channels.
    event_buffer_size: usize,
}

impl GameAdapterFactory {
    /// Create a factory sharing the given hub with the ingress.
    pub fn new(hub: Arc<GenericEventHub>, event_buffer_size: usize) -> Self {
        Self {
            hub,
            event_buffer_size,
        }
    }
}

#[async_trait]
impl AdapterFactory for GameAdapterFactory {
    async fn create(
        &self,
        kind: GameServerKind,
        connection_info: &serde_json::Value,
        game_server_id: GameServerId,
    ) -> AppResult<Arc<dyn EventStream>> {
        match kind {
            GameServerKind::Generic => {
                Ok(Arc::new(GenericAdapter::new(game_server_id, self.hub.clone())))
            }
            GameServerKind::Rust | GameServerKind::SevenDaysToDie => {
                let info: WsConnectionInfo = serde_json::from_value(connection_info.clone())
                    .map_err(|e| {
                        AppError::validation(format!(
                            "Invalid connection info for {game_server_id}: {e}"
                        ))
                    })?;
                Ok(Arc::new(WsAdapter::new(info.url(), self.event_buffer_size)))
            }
        }
    }
}
