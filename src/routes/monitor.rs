//! # routes::monitor
//!
//! Live feed for dashboards.
//!
//! | Method    | Path          | Description                                 |
//! |-----------|---------------|---------------------------------------------|
//! | GET (WS)  | `/ws/arena`   | `SNAPSHOT` on connect, then every event     |
//! | GET       | `/api/health` | Liveness, phase and counters                |

use std::sync::atomic::Ordering;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::state::SharedState;

// ─── WebSocket Handler ────────────────────────────────────────────────────────

pub async fn ws_arena(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    // The receiver yields exactly the events that follow the snapshot.
    let (game, mut rx) = state.subscribe_with_snapshot().await;
    let (mut sender, mut receiver) = socket.split();

    info!("🔌 WebSocket client connected");

    let snapshot = json!({
        "event": "SNAPSHOT",
        "game":  game,
    })
    .to_string();

    if sender.send(Message::Text(snapshot.into())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(json_str) => {
                        if sender.send(Message::Text(json_str.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!("WS client lagged, skipped {n} events");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            result = receiver.next() => {
                match result {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("🔌 WebSocket client disconnected");
}

// ─── GET /api/health ──────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let game = state.game.read().await;

    Json(json!({
        "ok":            true,
        "game_id":       game.game_id(),
        "phase":         game.phase(),
        "round":         game.round(),
        "command_count": state.command_count.load(Ordering::Relaxed),
        "ws_clients":    state.broadcast_tx.receiver_count(),
    }))
}
