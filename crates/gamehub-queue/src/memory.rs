//! In-memory event queue for tests and single-node development.

use async_trait::async_trait;
use tokio::sync::Mutex;

use gamehub_core::events::EventEnvelope;
use gamehub_core::result::AppResult;
use gamehub_core::traits::EventQueue;

/// Buffers event envelopes in memory.
#[derive(Debug, Default)]
pub struct InMemoryEventQueue {
    /// Enqueued envelopes in arrival order.
    events: Mutex<Vec<EventEnvelope>>,
}

impl InMemoryEventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently buffered envelopes.
    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    /// Whether the queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }

    /// Take all buffered envelopes, leaving the queue empty.
    pub async fn drain(&self) -> Vec<EventEnvelope> {
        std::mem::take(&mut *self.events.lock().await)
    }
}

#[async_trait]
impl EventQueue for InMemoryEventQueue {
    async fn enqueue(&self, envelope: EventEnvelope) -> AppResult<()> {
        self.events.lock().await.push(envelope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gamehub_core::events::{GameEvent, LogLine};
    use gamehub_core::types::id::{DomainId, GameServerId};

    #[tokio::test]
    async fn test_enqueue_and_drain() {
        let queue = InMemoryEventQueue::new();
        let envelope = EventEnvelope::new(
            DomainId::new(),
            GameServerId::new(),
            GameEvent::LogLine(LogLine {
                line: "hello".to_string(),
            }),
        );

        queue.enqueue(envelope).await.expect("enqueue");
        assert_eq!(queue.len().await, 1);

        let drained = queue.drain().await;
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty().await);
    }
}
