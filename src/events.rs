//! # events
//!
//! Defines [`GameEvent`] — everything the arena broadcasts to WebSocket
//! clients on `/ws/arena`.
//!
//! The reducer in `engine::game` returns these; `AppState::broadcast`
//! serialises them to JSON once and fans the string out over a
//! `tokio::sync::broadcast` channel.

use serde::Serialize;
use uuid::Uuid;

use crate::engine::leaderboard::Standing;
use crate::models::{Agent, Candle, TradeLog};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEvent {
    /// Fresh candles generated; agents are about to pick positions.
    RoundStarted {
        round: u32,
        total_rounds: u32,
        candles: usize,
        base_price: f64,
    },

    /// Every agent has opened its position for the round.
    TradesPlaced {
        round: u32,
        trades: Vec<TradeLog>,
        agents: Vec<Agent>,
    },

    /// One more candle is visible and balances were marked to market.
    CandleRevealed {
        round: u32,
        index: usize,
        is_last: bool,
        candle: Candle,
        agents: Vec<Agent>,
    },

    /// Positions closed. `next_round` is `None` after the final round.
    RoundComplete {
        round: u32,
        next_round: Option<u32>,
        closes: Vec<TradeLog>,
        agents: Vec<Agent>,
    },

    GameOver {
        champion: Standing,
        standings: Vec<Standing>,
    },

    GameReset {
        game_id: Uuid,
        epoch: u64,
    },
}

impl GameEvent {
    /// Serialise for the WebSocket wire.
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tag_is_screaming_snake_case() {
        let json = GameEvent::GameReset { game_id: Uuid::nil(), epoch: 3 }.to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "GAME_RESET");
        assert_eq!(value["epoch"], 3);
    }
}
