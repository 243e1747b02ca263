//! Outbound event queue trait.

use async_trait::async_trait;

use crate::events::EventEnvelope;
use crate::result::AppResult;

/// Durable queue that forwarded game events are appended to for
/// downstream processing.
#[async_trait]
pub trait EventQueue: Send + Sync + std::fmt::Debug + 'static {
    /// Append one event envelope to the queue.
    async fn enqueue(&self, envelope: EventEnvelope) -> AppResult<()>;
}
