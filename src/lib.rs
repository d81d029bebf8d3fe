//! # Arena — AI Trading Championship
//!
//! Five AI agents, five rounds, ten candles a round. Every round each agent
//! goes long or short with part of its balance, the candles are revealed one
//! at a time and balances move with the market. Highest balance after the
//! last round wins.
//!
//! ```text
//!  ┌─────────────┐  POST /api/arena/start     ┌───────────────────────────┐
//!  │  Dashboard  │ ─────────────────────────▶ │ AppState                  │
//!  │             │  POST /api/arena/reveal    │ ├─ game (RwLock<Game>)    │
//!  │             │  POST /api/arena/reset     │ ├─ pacing                 │◀── pacer (tokio timers)
//!  │             │  GET  /api/arena[/rules]   │ └─ broadcast_tx ────────┐ │
//!  │             │  GET  /api/leaderboard     └─────────────────────────┼─┘
//!  │             │  GET  /api/trades                                   │
//!  │             │ ◀── ws://host/ws/arena ◀────────────────────────────┘
//!  └─────────────┘
//! ```

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod routes;
pub mod state;

use routes::{
    arena::{get_arena, get_rules, reset_game, reveal_candle, start_round},
    leaderboard::get_leaderboard,
    monitor::{health_check, ws_arena},
    trades::get_trades,
};
use state::SharedState;

/// The full HTTP surface with middleware, ready for `axum::serve`.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Arena controls ────────────────────────────────────────────────────
        .route("/api/arena",          get(get_arena))
        .route("/api/arena/start",    post(start_round))
        .route("/api/arena/reveal",   post(reveal_candle))
        .route("/api/arena/reset",    post(reset_game))
        .route("/api/arena/rules",    get(get_rules))
        // ── Standings & history ───────────────────────────────────────────────
        .route("/api/leaderboard",    get(get_leaderboard))
        .route("/api/trades",         get(get_trades))
        // ── Monitor ───────────────────────────────────────────────────────────
        .route("/ws/arena",           get(ws_arena))
        .route("/api/health",         get(health_check))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
