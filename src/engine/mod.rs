//! The simulation: market feed, P&L bookkeeping, the round state machine and
//! the timers that pace it.

pub mod game;
pub mod leaderboard;
pub mod market;
pub mod pacer;
pub mod pnl;
