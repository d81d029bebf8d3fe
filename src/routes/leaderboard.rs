//! # routes::leaderboard
//!
//! `GET /api/leaderboard` — agents ranked by balance, live while a round runs.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{engine::leaderboard::standings, state::SharedState};

pub async fn get_leaderboard(State(state): State<SharedState>) -> impl IntoResponse {
    let game = state.game.read().await;
    let table = standings(game.agents());

    Json(json!({
        "ok":           true,
        "round":        game.round(),
        "phase":        game.phase(),
        "is_final":     game.is_game_over(),
        "standings":    table,
    }))
}
