//! # routes::arena
//!
//! The arena controls — what the "Start Game / Next Round", "Reset" and
//! "Game Rules" buttons do.
//!
//! | Method | Path                 | Description                                   |
//! |--------|----------------------|-----------------------------------------------|
//! | GET    | `/api/arena`         | Current game snapshot                         |
//! | POST   | `/api/arena/start`   | Start the next round; the pacer takes it from there |
//! | POST   | `/api/arena/reveal`  | Reveal the next candle manually               |
//! | POST   | `/api/arena/reset`   | Throw the championship away and start over    |
//! | GET    | `/api/arena/rules`   | Rules of the championship                     |

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::{
    engine::{
        game::GameCommand,
        pacer::{self, reveals_last_candle},
    },
    error::AppError,
    state::SharedState,
};

// ─── GET /api/arena ───────────────────────────────────────────────────────────

pub async fn get_arena(State(state): State<SharedState>) -> impl IntoResponse {
    let snapshot = state.game.read().await.snapshot();
    Json(json!({ "ok": true, "game": snapshot }))
}

// ─── POST /api/arena/start ────────────────────────────────────────────────────

/// Generate the round's candles, then hand over to the pacer which places
/// trades after the start delay and keeps revealing.
pub async fn start_round(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let dispatched = state.dispatch(GameCommand::StartRound).await?;
    pacer::spawn_round(state.clone(), dispatched.key);

    let snapshot = state.game.read().await.snapshot();
    info!(round = snapshot.round, epoch = dispatched.key.epoch, "▶️ [ARENA] Round started via API");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "ok":     true,
            "round":  snapshot.round,
            "events": dispatched.events,
            "game":   snapshot,
        })),
    ))
}

// ─── POST /api/arena/reveal ───────────────────────────────────────────────────

/// Reveal one candle now. If it was the round's last, the close is scheduled
/// after the close delay exactly as for an automatic reveal.
pub async fn reveal_candle(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let dispatched = state.dispatch(GameCommand::RevealNext).await?;
    let round_finished = reveals_last_candle(&dispatched.events);
    if round_finished {
        pacer::spawn_finish(state.clone(), dispatched.key);
    }

    Ok(Json(json!({
        "ok":             true,
        "round_finished": round_finished,
        "events":         dispatched.events,
    })))
}

// ─── POST /api/arena/reset ────────────────────────────────────────────────────

pub async fn reset_game(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let dispatched = state.dispatch(GameCommand::Reset).await?;
    let snapshot = state.game.read().await.snapshot();

    info!(epoch = dispatched.key.epoch, "🔄 [ARENA] Game reset via API");

    Ok(Json(json!({
        "ok":      true,
        "message": "All progress has been reset",
        "game":    snapshot,
    })))
}

// ─── GET /api/arena/rules ─────────────────────────────────────────────────────

pub async fn get_rules(State(state): State<SharedState>) -> impl IntoResponse {
    let (rules, agent_count) = {
        let game = state.game.read().await;
        (game.rules().clone(), game.agents().len())
    };
    let pacing = &state.pacing;

    Json(json!({
        "ok":    true,
        "rules": rules,
        "pacing": {
            "start_delay_ms":     pacing.start_delay.as_millis() as u64,
            "reveal_interval_ms": pacing.reveal_interval.as_millis() as u64,
            "close_delay_ms":     pacing.close_delay.as_millis() as u64,
            "auto_reveal":        pacing.auto_reveal,
        },
        "summary": [
            format!("{agent_count} AI agents start with ${:.0} each.", rules.initial_balance),
            format!(
                "Each round every agent goes long or short with {:.0}–{:.0}% of its balance.",
                rules.min_position_fraction * 100.0,
                rules.max_position_fraction * 100.0,
            ),
            format!(
                "{} candles are revealed one by one; balances move with every candle.",
                rules.candles_per_round,
            ),
            "All positions close when the last candle of a round is revealed.".to_string(),
            format!(
                "After {} rounds the agent with the highest balance is champion.",
                rules.total_rounds,
            ),
        ],
    }))
}
