//! Redis stream producer for the outbound event queue.

use async_trait::async_trait;
use tracing::debug;

use gamehub_core::error::AppError;
use gamehub_core::events::EventEnvelope;
use gamehub_core::result::AppResult;
use gamehub_core::traits::EventQueue;

/// Appends event envelopes to a Redis stream via `XADD`.
#[derive(Debug, Clone)]
pub struct RedisEventQueue {
    /// Redis client (connections are established per operation).
    client: redis::Client,
    /// Stream key events are appended to.
    stream_key: String,
}

impl RedisEventQueue {
    /// Create a producer for the given Redis URL and stream key.
    pub fn new(url: &str, stream_key: &str) -> AppResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| AppError::queue(format!("Redis connection failed: {e}")))?;

        Ok(Self {
            client,
            stream_key: stream_key.to_string(),
        })
    }
}

#[async_trait]
impl EventQueue for RedisEventQueue {
    async fn enqueue(&self, envelope: EventEnvelope) -> AppResult<()> {
        let payload = serde_json::to_string(&envelope)?;

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::queue(format!("Redis connection failed: {e}")))?;

        let entry_id: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("*")
            .arg("type")
            .arg(envelope.kind.to_string())
            .arg("payload")
            .arg(payload)
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::queue(format!("Redis XADD failed: {e}")))?;

        debug!(
            stream = %self.stream_key,
            entry_id = %entry_id,
            kind = %envelope.kind,
            game_server_id = %envelope.game_server_id,
            "Enqueued event"
        );

        Ok(())
    }
}
