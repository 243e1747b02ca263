//! Event forwarder — drains one connection's event stream into the
//! outbound queue.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use gamehub_core::events::EventEnvelope;
use gamehub_core::traits::{EventQueue, StreamEvent};
use gamehub_core::types::id::{DomainId, GameServerId};

/// Spawn the forwarder task for one connection.
///
/// Every decoded event refreshes the shared liveness timestamp and is
/// enqueued; enqueue failures are logged and swallowed so a queue outage
/// never kills the stream consumer. Connection-level errors are logged
/// only — recovery is the watchdog's and reconciler's job, which avoids
/// a thundering herd of reconnects on transient protocol errors.
pub(crate) fn spawn_forwarder(
    domain_id: DomainId,
    game_server_id: GameServerId,
    last_event_at: Arc<AtomicI64>,
    queue: Arc<dyn EventQueue>,
    mut events: broadcast::Receiver<StreamEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(StreamEvent::Event(event)) => {
                    last_event_at.store(Utc::now().timestamp_millis(), Ordering::SeqCst);

                    let kind = event.kind();
                    trace!(
                        game_server_id = %game_server_id,
                        kind = %kind,
                        "Received game event"
                    );

                    let envelope = EventEnvelope::new(domain_id, game_server_id, event);
                    if let Err(e) = queue.enqueue(envelope).await {
                        error!(
                            game_server_id = %game_server_id,
                            kind = %kind,
                            error = %e,
                            "Failed to enqueue event"
                        );
                    }
                }
                Ok(StreamEvent::Error { message }) => {
                    error!(
                        game_server_id = %game_server_id,
                        message = %message,
                        "Error from game server connection"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        game_server_id = %game_server_id,
                        skipped,
                        "Event stream lagged, events dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        debug!(game_server_id = %game_server_id, "Event forwarder stopped");
    })
}
