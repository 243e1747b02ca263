//! Websocket ingress for self-registering game servers.
//!
//! Self-registering servers dial in here, identify themselves with an
//! identity/registration token pair, and then push their game events as
//! tagged JSON frames. Identified events are published into the
//! [`GenericEventHub`], where the server's generic adapter picks them up
//! and feeds them through the normal forwarder path.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::time;
use tracing::{debug, info, warn};

use gamehub_adapters::GenericEventHub;
use gamehub_core::config::ingress::IngressConfig;
use gamehub_core::events::GameEvent;
use gamehub_core::traits::StreamEvent;
use gamehub_core::types::id::GameServerId;

use crate::manager::GameServerManager;

/// Frames a connected game server may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
enum InboundFrame {
    /// Application-level keepalive.
    Ping,
    /// Identify handshake.
    Identify {
        identity_token: String,
        registration_token: String,
        #[serde(default)]
        name: Option<String>,
    },
    /// A game event from an identified server.
    GameEvent(GameEvent),
}

/// Frames the ingress sends back.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
enum OutboundFrame {
    /// Answer to a ping.
    Pong,
    /// Successful identify.
    Identified { game_server_id: GameServerId },
    /// Protocol or handshake error.
    Error { message: String },
}

/// Shared state for the ingress routes.
#[derive(Debug, Clone)]
pub struct IngressState {
    /// Lifecycle controller handling the identify handshake.
    manager: Arc<GameServerManager>,
    /// Hub identified events are published into.
    hub: Arc<GenericEventHub>,
    /// Interval between server-initiated pings.
    heartbeat_interval: Duration,
}

impl IngressState {
    /// Assemble the ingress state.
    pub fn new(
        manager: Arc<GameServerManager>,
        hub: Arc<GenericEventHub>,
        config: &IngressConfig,
    ) -> Self {
        Self {
            manager,
            hub,
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_seconds),
        }
    }
}

/// Build the ingress router.
pub fn router(state: IngressState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

/// GET /ws — websocket upgrade for game servers.
async fn ws_handler(State(state): State<IngressState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_connection(state, socket))
}

/// Drives one game-server socket until it closes or goes silent.
async fn handle_connection(state: IngressState, mut socket: WebSocket) {
    let mut identified: Option<GameServerId> = None;
    let mut awaiting_pong = false;

    let mut heartbeat = time::interval(state.heartbeat_interval);
    // The first tick completes immediately; consume it so the first ping
    // goes out one full interval after connect.
    heartbeat.tick().await;

    debug!("Ingress connection opened");

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if awaiting_pong {
                    warn!(game_server_id = ?identified, "Heartbeat missed, closing connection");
                    break;
                }
                awaiting_pong = true;
                if socket.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if !handle_frame(&state, &mut socket, &mut identified, text.as_str()).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        awaiting_pong = false;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(game_server_id = ?identified, error = %e, "Ingress socket error");
                        break;
                    }
                }
            }
        }
    }

    info!(game_server_id = ?identified, "Ingress connection closed");
}

/// Handle one text frame. Returns `false` when the socket should close.
async fn handle_frame(
    state: &IngressState,
    socket: &mut WebSocket,
    identified: &mut Option<GameServerId>,
    text: &str,
) -> bool {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(error = %e, "Undecodable ingress frame");
            return send_frame(
                socket,
                &OutboundFrame::Error {
                    message: "Invalid message format".to_string(),
                },
            )
            .await;
        }
    };

    match frame {
        InboundFrame::Ping => send_frame(socket, &OutboundFrame::Pong).await,
        InboundFrame::Identify {
            identity_token,
            registration_token,
            name,
        } => {
            match state
                .manager
                .handle_identify(&identity_token, &registration_token, name.as_deref())
                .await
            {
                Ok(game_server_id) => {
                    *identified = Some(game_server_id);
                    send_frame(socket, &OutboundFrame::Identified { game_server_id }).await
                }
                Err(e) => {
                    warn!(error = %e, "Game server tried to identify but could not be resolved");
                    send_frame(
                        socket,
                        &OutboundFrame::Error {
                            message: "Could not identify game server".to_string(),
                        },
                    )
                    .await
                }
            }
        }
        InboundFrame::GameEvent(event) => {
            let Some(game_server_id) = identified else {
                return send_frame(
                    socket,
                    &OutboundFrame::Error {
                        message: "Not identified".to_string(),
                    },
                )
                .await;
            };

            let delivered = state
                .hub
                .publish(*game_server_id, StreamEvent::Event(event));
            if delivered == 0 {
                debug!(
                    game_server_id = %game_server_id,
                    "Event for a server with no attached adapter, dropped"
                );
            }
            true
        }
    }
}

/// Serialize and send a frame. Returns `false` when the socket is gone.
async fn send_frame(socket: &mut WebSocket, frame: &OutboundFrame) -> bool {
    match serde_json::to_string(frame) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize outbound frame");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_identify_frame_decodes() {
        let json = r#"{
            "type": "identify",
            "payload": {
                "identity_token": "srv-1",
                "registration_token": "reg-1"
            }
        }"#;
        let frame: InboundFrame = serde_json::from_str(json).expect("decode");
        match frame {
            InboundFrame::Identify {
                identity_token,
                registration_token,
                name,
            } => {
                assert_eq!(identity_token, "srv-1");
                assert_eq!(registration_token, "reg-1");
                assert!(name.is_none());
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_inbound_game_event_frame_decodes() {
        let json = r#"{
            "type": "game_event",
            "payload": {
                "kind": "chat-message",
                "data": {
                    "player": {"game_id": "p1", "name": "steve"},
                    "channel": "global",
                    "message": "gg"
                }
            }
        }"#;
        let frame: InboundFrame = serde_json::from_str(json).expect("decode");
        assert!(matches!(
            frame,
            InboundFrame::GameEvent(GameEvent::ChatMessage(_))
        ));
    }

    #[test]
    fn test_outbound_error_frame_shape() {
        let frame = OutboundFrame::Error {
            message: "nope".to_string(),
        };
        let json = serde_json::to_value(&frame).expect("encode");
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["message"], "nope");
    }
}
