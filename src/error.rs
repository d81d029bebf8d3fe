//! # error
//!
//! Centralised error types.
//!
//! [`GameError`] is what the arena reducer rejects a command with.
//! [`AppError`] is what every handler returns; Axum's `IntoResponse` impl turns
//! it into a structured JSON body so clients always get a machine-readable
//! response even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::game::{GameCommand, GamePhase};

// ─── GameError ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The command is not legal in the current phase.
    #[error("cannot apply {command:?} while the game is {phase:?}")]
    InvalidTransition { command: GameCommand, phase: GamePhase },

    #[error("all candles of this round are already revealed")]
    AllCandlesRevealed,

    #[error("round cannot complete: {revealed}/{total} candles revealed")]
    CandlesPending { revealed: usize, total: usize },

    #[error("round has no candles")]
    EmptyRound,
}

// ─── AppError ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AppError {
    /// The request was syntactically correct but semantically invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The arena rejected the command in its current phase.
    #[error("Conflict: {0}")]
    Conflict(#[from] GameError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
