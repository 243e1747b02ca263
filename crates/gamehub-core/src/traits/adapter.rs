//! Protocol adapter traits.
//!
//! A protocol adapter owns the live wire connection to one game server
//! and translates its native protocol into [`GameEvent`]s.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::events::GameEvent;
use crate::result::AppResult;
use crate::types::game_server::GameServerKind;
use crate::types::id::GameServerId;

/// One item on an adapter's event stream.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A decoded game event.
    Event(GameEvent),
    /// A connection-level protocol error. Reported for observability;
    /// recovery is left to the watchdog and reconciler.
    Error {
        /// Description of the failure.
        message: String,
    },
}

/// A live, startable event source for one game server connection.
///
/// `start` and `stop` are asynchronous and may fail; implementations must
/// make `stop` safe to call regardless of state, because teardown is
/// best-effort and must never block registry cleanup.
#[async_trait]
pub trait EventStream: Send + Sync + std::fmt::Debug + 'static {
    /// Establish the connection and begin emitting events.
    async fn start(&self) -> AppResult<()>;

    /// Tear the connection down and stop emitting.
    async fn stop(&self) -> AppResult<()>;

    /// Subscribe to the events emitted by this stream.
    fn subscribe(&self) -> broadcast::Receiver<StreamEvent>;
}

/// Factory producing a protocol adapter for a game server's kind and
/// connection info.
#[async_trait]
pub trait AdapterFactory: Send + Sync + std::fmt::Debug + 'static {
    /// Construct an adapter for the given server.
    ///
    /// The returned stream is not yet started.
    async fn create(
        &self,
        kind: GameServerKind,
        connection_info: &serde_json::Value,
        game_server_id: GameServerId,
    ) -> AppResult<Arc<dyn EventStream>>;
}
