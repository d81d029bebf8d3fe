//! Axum route handlers, grouped by concern.

pub mod arena;
pub mod leaderboard;
pub mod monitor;
pub mod trades;
