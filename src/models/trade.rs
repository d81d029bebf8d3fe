//! # models::trade
//!
//! [`TradeLog`] — the append-only record of every position an agent opened or
//! closed. Entries are never mutated after they are written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Agent, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Long,
    Short,
    Close,
}

impl From<Position> for TradeAction {
    fn from(position: Position) -> Self {
        match position {
            Position::Long => TradeAction::Long,
            Position::Short => TradeAction::Short,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLog {
    pub trade_id: Uuid,
    pub agent_id: String,
    pub agent_name: String,
    pub action: TradeAction,
    pub amount: f64,
    pub price: f64,
    pub round: u32,
    pub timestamp: DateTime<Utc>,
}

impl TradeLog {
    pub fn new(
        agent: &Agent,
        action: TradeAction,
        amount: f64,
        price: f64,
        round: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            trade_id: Uuid::new_v4(),
            agent_id: agent.id.clone(),
            agent_name: agent.name.clone(),
            action,
            amount,
            price,
            round,
            timestamp,
        }
    }

    /// The position this log opens, or `None` for a close.
    pub fn opened_position(&self) -> Option<Position> {
        match self.action {
            TradeAction::Long => Some(Position::Long),
            TradeAction::Short => Some(Position::Short),
            TradeAction::Close => None,
        }
    }
}
