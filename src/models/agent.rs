//! # models::agent
//!
//! Defines [`Agent`], one AI contestant in the championship, and the
//! [`Position`] it may hold while a round is running.

use serde::{Deserialize, Serialize};

// ─── Position ─────────────────────────────────────────────────────────────────

/// Directional exposure an agent holds for the duration of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Long,
    Short,
}

impl Position {
    /// `+1.0` for long, `-1.0` for short. No leverage in this game.
    #[inline]
    pub fn exposure(self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }
}

// ─── Agent ────────────────────────────────────────────────────────────────────

/// An AI trader competing in the arena.
///
/// `initial_balance` is fixed at creation; `balance` moves with every revealed
/// candle while a position is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// Single glyph shown next to the name.
    pub avatar: String,
    pub balance: f64,
    pub initial_balance: f64,
    /// `None` between rounds.
    pub position: Option<Position>,
    pub position_size: f64,
    /// `(balance - initial_balance) / initial_balance * 100`, refreshed on
    /// every balance change.
    pub pnl_percent: f64,
}

impl Agent {
    pub fn new(id: &str, name: &str, avatar: &str, initial_balance: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            avatar: avatar.to_string(),
            balance: initial_balance,
            initial_balance,
            position: None,
            position_size: 0.0,
            pnl_percent: 0.0,
        }
    }

    /// True when the agent carries exposure that a price move can affect.
    #[inline]
    pub fn has_exposure(&self) -> bool {
        self.position.is_some() && self.position_size != 0.0
    }

    /// Overwrite the balance and recompute the derived P&L percentage.
    pub fn set_balance(&mut self, balance: f64) {
        self.balance = balance;
        self.pnl_percent = if self.initial_balance == 0.0 {
            0.0
        } else {
            (balance - self.initial_balance) / self.initial_balance * 100.0
        };
    }
}

/// The five contestants every game starts with.
pub fn default_roster(initial_balance: f64) -> Vec<Agent> {
    [
        ("agent1", "CombatBot8543", "🤖"),
        ("agent2", "MetropolisAI", "🧠"),
        ("agent3", "NeuralTrader", "💡"),
        ("agent4", "QuantumLens", "🔮"),
        ("agent5", "AlphaMatrix", "📊"),
    ]
    .into_iter()
    .map(|(id, name, avatar)| Agent::new(id, name, avatar, initial_balance))
    .collect()
}
