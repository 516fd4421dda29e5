// ABOUTME: WebSocket route upgrading connections into streaming sessions
// ABOUTME: Read and write pumps bridging the socket to the session's channels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Souschef Labs

//! # Streaming Routes
//!
//! Upgrades `GET /ws` to a WebSocket and wires it to a
//! [`StreamingSession`]. The connection is split into two cooperating
//! tasks: a read pump that parses inbound frames and forwards them to the
//! session, and a write pump that drains the session's outbound queue and
//! owns the keep-alive heartbeat. The pumps share nothing but the session's
//! channels.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};
use tracing::{debug, info, warn};

use super::session::{SessionContext, StreamingSession};
use super::{SessionRegistry, StreamMessage};

/// Shared state for the streaming routes
#[derive(Clone)]
pub struct StreamState {
    pub context: Arc<SessionContext>,
    pub registry: Arc<SessionRegistry>,
}

/// Streaming routes implementation
pub struct StreamingRoutes;

impl StreamingRoutes {
    /// Create the WebSocket routes with injected state
    pub fn routes(state: StreamState) -> Router {
        Router::new()
            .route("/ws", get(handle_websocket))
            .route("/ws/recipes", get(handle_websocket))
            .with_state(state)
    }
}

/// Handle WebSocket upgrade and hand the socket to the session plumbing
async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<StreamState>,
) -> impl IntoResponse {
    info!("new WebSocket connection request");
    ws.on_upgrade(move |socket: WebSocket| handle_socket(socket, state))
}

/// Drive one connection: session actor, write pump, read pump
async fn handle_socket(socket: WebSocket, state: StreamState) {
    let (session, outbound_rx) = StreamingSession::new(Arc::clone(&state.context));
    let session_id = session.id();
    let sender = session.sender();

    state.registry.register(session_id, session.handle()).await;

    let (inbound_tx, inbound_rx) = mpsc::channel::<StreamMessage>(16);
    let session_task = tokio::spawn(session.run(inbound_rx));

    let (ws_tx, mut ws_rx) = socket.split();
    let heartbeat = Duration::from_secs(state.context.streaming.heartbeat_secs);
    let write_task = tokio::spawn(write_pump(ws_tx, outbound_rx, heartbeat));

    // Read pump runs on this task; the read deadline is refreshed by any
    // inbound frame, including transport-level pongs.
    let read_timeout = Duration::from_secs(state.context.streaming.read_timeout_secs);
    loop {
        let frame = match timeout(read_timeout, ws_rx.next()).await {
            Err(_) => {
                warn!(session_id = %session_id, "read timeout, tearing down session");
                break;
            }
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                debug!(session_id = %session_id, error = %e, "WebSocket read error");
                break;
            }
            Ok(Some(Ok(frame))) => frame,
        };

        match frame {
            Message::Text(text) => match serde_json::from_str::<StreamMessage>(&text) {
                Ok(msg) => {
                    if inbound_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(session_id = %session_id, error = %e, "invalid message format");
                    sender.send(StreamMessage::error("parse_error", "invalid message format"));
                }
            },
            Message::Close(_) => break,
            // Ping/Pong/Binary frames only refresh the read deadline.
            _ => {}
        }
    }

    // Teardown: unregister first, then let the tasks wind down. Dropping
    // the inbound sender ends the session actor's loop.
    state.registry.unregister(session_id).await;
    drop(inbound_tx);
    let _ = session_task.await;
    write_task.abort();
}

/// Drain the outbound queue into the socket and emit keep-alive pings
async fn write_pump(
    mut ws_tx: futures_util::stream::SplitSink<WebSocket, Message>,
    mut outbound_rx: mpsc::Receiver<StreamMessage>,
    heartbeat: Duration,
) {
    let mut ticker = interval(heartbeat);
    // The first tick fires immediately; skip it so the heartbeat starts one
    // interval after connect.
    ticker.tick().await;

    loop {
        tokio::select! {
            msg = outbound_rx.recv() => {
                let Some(msg) = msg else { break };
                let Ok(text) = serde_json::to_string(&msg) else {
                    warn!("failed to serialize outbound message");
                    continue;
                };
                if ws_tx.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }
}
