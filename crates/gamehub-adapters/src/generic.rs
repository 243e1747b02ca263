//! Event plumbing for self-registering servers.
//!
//! Self-registering servers dial into the connector's websocket ingress
//! instead of being dialed. The ingress publishes their events into the
//! [`GenericEventHub`]; a [`GenericAdapter`] subscribed to the hub makes
//! them flow through the same forwarder path as dialed servers.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use gamehub_core::result::AppResult;
use gamehub_core::traits::{EventStream, StreamEvent};
use gamehub_core::types::id::GameServerId;

/// In-process fan-out of ingress events, one channel per game server.
///
/// Channels are created lazily and persist across reconnects of the
/// originating server, so a re-`add` picks up the same feed.
#[derive(Debug)]
pub struct GenericEventHub {
    /// Game server → broadcast sender.
    channels: DashMap<GameServerId, broadcast::Sender<StreamEvent>>,
    /// Buffer size for newly created channels.
    buffer_size: usize,
}

impl GenericEventHub {
    /// Create an empty hub.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size,
        }
    }

    fn sender(&self, game_server_id: GameServerId) -> broadcast::Sender<StreamEvent> {
        self.channels
            .entry(game_server_id)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .clone()
    }

    /// Publish an event for a game server.
    ///
    /// Returns the number of subscribers that received it; zero means no
    /// adapter is currently attached (the server has not been added yet,
    /// or was removed).
    pub fn publish(&self, game_server_id: GameServerId, event: StreamEvent) -> usize {
        self.sender(game_server_id).send(event).unwrap_or(0)
    }

    /// Subscribe to a game server's event feed.
    pub fn subscribe(&self, game_server_id: GameServerId) -> broadcast::Receiver<StreamEvent> {
        self.sender(game_server_id).subscribe()
    }
}

/// Event stream for a self-registering server, backed by the hub.
///
/// There is no wire connection to establish: the server pushes events
/// through the ingress, so `start` and `stop` have nothing to do.
#[derive(Debug)]
pub struct GenericAdapter {
    /// The server this adapter serves.
    game_server_id: GameServerId,
    /// Shared hub the ingress publishes into.
    hub: Arc<GenericEventHub>,
}

impl GenericAdapter {
    /// Create an adapter attached to the hub.
    pub fn new(game_server_id: GameServerId, hub: Arc<GenericEventHub>) -> Self {
        Self {
            game_server_id,
            hub,
        }
    }
}

#[async_trait]
impl EventStream for GenericAdapter {
    async fn start(&self) -> AppResult<()> {
        debug!(game_server_id = %self.game_server_id, "Generic adapter attached");
        Ok(())
    }

    async fn stop(&self) -> AppResult<()> {
        debug!(game_server_id = %self.game_server_id, "Generic adapter detached");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.hub.subscribe(self.game_server_id)
    }
}
