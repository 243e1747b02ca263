//! Dial-out websocket adapter.
//!
//! Connects to a game server's websocket event feed and decodes JSON
//! frames into game events.

use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use async_trait::async_trait;

use gamehub_core::error::AppError;
use gamehub_core::events::GameEvent;
use gamehub_core::result::AppResult;
use gamehub_core::traits::{EventStream, StreamEvent};

/// Connection info for websocket-dialed server kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct WsConnectionInfo {
    /// Hostname or IP of the game server.
    pub host: String,
    /// Websocket port.
    pub port: u16,
    /// Whether to use TLS.
    #[serde(default)]
    pub use_tls: bool,
}

impl WsConnectionInfo {
    /// The websocket URL to dial.
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Event stream backed by an outbound websocket connection.
#[derive(Debug)]
pub struct WsAdapter {
    /// URL dialed on start.
    url: String,
    /// Fan-out channel for decoded events.
    events_tx: broadcast::Sender<StreamEvent>,
    /// Shutdown signal for the read loop.
    shutdown_tx: watch::Sender<bool>,
    /// Read loop task, present while started.
    read_task: Mutex<Option<JoinHandle<()>>>,
}

impl WsAdapter {
    /// Create an adapter that will dial `url` when started.
    pub fn new(url: String, event_buffer_size: usize) -> Self {
        let (events_tx, _) = broadcast::channel(event_buffer_size);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            url,
            events_tx,
            shutdown_tx,
            read_task: Mutex::new(None),
        }
    }
}

#[async_trait]
impl EventStream for WsAdapter {
    async fn start(&self) -> AppResult<()> {
        let mut task_slot = self.read_task.lock().await;
        if task_slot.is_some() {
            return Err(AppError::adapter(format!(
                "Adapter for {} is already started",
                self.url
            )));
        }

        let (socket, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| AppError::adapter(format!("Failed to connect to {}: {e}", self.url)))?;

        debug!(url = %self.url, "Websocket connected");

        let url = self.url.clone();
        let events_tx = self.events_tx.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let (_, mut read) = socket.split();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    frame = read.next() => {
                        match frame {
                            Some(Ok(Message::Text(text))) => {
                                match serde_json::from_str::<GameEvent>(text.as_str()) {
                                    Ok(event) => {
                                        let _ = events_tx.send(StreamEvent::Event(event));
                                    }
                                    Err(e) => {
                                        let _ = events_tx.send(StreamEvent::Error {
                                            message: format!("Undecodable frame: {e}"),
                                        });
                                    }
                                }
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                let _ = events_tx.send(StreamEvent::Error {
                                    message: "Connection closed by server".to_string(),
                                });
                                break;
                            }
                            Some(Ok(_)) => {}
                            Some(Err(e)) => {
                                let _ = events_tx.send(StreamEvent::Error {
                                    message: format!("Websocket error: {e}"),
                                });
                                break;
                            }
                        }
                    }
                }
            }

            debug!(url = %url, "Websocket read loop ended");
        });

        *task_slot = Some(handle);
        Ok(())
    }

    async fn stop(&self) -> AppResult<()> {
        let _ = self.shutdown_tx.send(true);

        if let Some(mut handle) = self.read_task.lock().await.take() {
            // The read loop observes the shutdown signal on its next poll;
            // abort is the backstop for a wedged socket.
            if tokio::time::timeout(std::time::Duration::from_secs(5), &mut handle)
                .await
                .is_err()
            {
                warn!(url = %self.url, "Read loop did not stop in time, aborting");
                handle.abort();
            }
        }

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
        self.events_tx.subscribe()
    }
}
