//! # engine::game
//!
//! **Round / Reveal State Machine** — the championship as a reducer.
//!
//! ```text
//!            StartRound          PlaceTrades            RevealNext × N
//!   Idle ─────────────▶ RoundStarting ─────────▶ RevealingCandles ──┐
//!    ▲                                                 │  ▲         │
//!    │                                                 │  └─────────┘
//!    │ Reset (from any phase)            CompleteRound │ (all revealed)
//!    │                                                 ▼
//!    │                  StartRound             ┌── RoundComplete   (round < last)
//!    │    RoundStarting ◀──────────────────────┘
//!    │                                         └── GameOver        (round == last)
//! ```
//!
//! [`Game::apply`] is the only way state changes. A rejected command returns a
//! [`GameError`] and leaves the game exactly as it was.

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::{leaderboard, market, pnl};
use crate::error::GameError;
use crate::events::GameEvent;
use crate::models::{default_roster, Agent, Candle, TradeLog};

// ─── Rules ────────────────────────────────────────────────────────────────────

/// Fixed parameters of a championship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRules {
    pub total_rounds: u32,
    pub candles_per_round: usize,
    pub initial_balance: f64,
    /// Random-walk step as a fraction of the round's base price.
    pub volatility: f64,
    pub min_position_fraction: f64,
    pub max_position_fraction: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            total_rounds: 5,
            candles_per_round: 10,
            initial_balance: 100_000.0,
            volatility: market::DEFAULT_VOLATILITY,
            min_position_fraction: pnl::MIN_POSITION_FRACTION,
            max_position_fraction: pnl::MAX_POSITION_FRACTION,
        }
    }
}

// ─── Phase & Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Idle,
    RoundStarting,
    RevealingCandles,
    RoundComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameCommand {
    StartRound,
    PlaceTrades,
    RevealNext,
    CompleteRound,
    Reset,
}

// ─── Pace Key ─────────────────────────────────────────────────────────────────

/// Identifies one run of one round. Timers spawned for a round carry the key
/// it had at `StartRound`; once it changes they must stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaceKey {
    /// Bumped on every reset.
    pub epoch: u64,
    /// Bumped on every `StartRound`.
    pub run: u64,
}

// ─── Snapshot ─────────────────────────────────────────────────────────────────

/// What clients are allowed to see. Unrevealed candles are withheld.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub game_id: Uuid,
    pub epoch: u64,
    pub phase: GamePhase,
    pub round: u32,
    pub total_rounds: u32,
    pub agents: Vec<Agent>,
    pub candles: Vec<Candle>,
    pub revealed_count: usize,
    pub total_candles: usize,
    pub trade_count: usize,
    pub can_start_round: bool,
    pub is_game_over: bool,
    pub champion: Option<leaderboard::Standing>,
}

// ─── Game ─────────────────────────────────────────────────────────────────────

pub struct Game {
    game_id: Uuid,
    /// Bumped on every reset.
    epoch: u64,
    /// Bumped on every `StartRound`. Together with `epoch` forms the [`PaceKey`].
    run: u64,
    phase: GamePhase,
    /// Current round, 1-based, never above `rules.total_rounds`.
    round: u32,
    rules: GameRules,
    agents: Vec<Agent>,
    candles: Vec<Candle>,
    trade_logs: Vec<TradeLog>,
    seed: Option<u64>,
    rng: StdRng,
}

impl Game {
    /// A fresh game in `Idle`. With a seed the whole championship is
    /// reproducible; without one the RNG draws from OS entropy.
    pub fn new(rules: GameRules, seed: Option<u64>, now: DateTime<Utc>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut game = Self {
            game_id: Uuid::new_v4(),
            epoch: 0,
            run: 0,
            phase: GamePhase::Idle,
            round: 1,
            agents: default_roster(rules.initial_balance),
            candles: Vec::new(),
            trade_logs: Vec::new(),
            rules,
            seed,
            rng,
        };
        game.candles = game.round_candles(now);
        game
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn game_id(&self) -> Uuid { self.game_id }
    pub fn epoch(&self) -> u64 { self.epoch }
    pub fn pace_key(&self) -> PaceKey { PaceKey { epoch: self.epoch, run: self.run } }
    pub fn phase(&self) -> GamePhase { self.phase }
    pub fn round(&self) -> u32 { self.round }
    pub fn rules(&self) -> &GameRules { &self.rules }
    pub fn agents(&self) -> &[Agent] { &self.agents }
    pub fn candles(&self) -> &[Candle] { &self.candles }
    pub fn trade_logs(&self) -> &[TradeLog] { &self.trade_logs }

    pub fn revealed_count(&self) -> usize {
        self.candles.iter().filter(|c| c.revealed).count()
    }

    pub fn all_revealed(&self) -> bool {
        self.revealed_count() == self.candles.len()
    }

    pub fn can_start_round(&self) -> bool {
        matches!(self.phase, GamePhase::Idle | GamePhase::RoundComplete)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.game_id,
            epoch: self.epoch,
            phase: self.phase,
            round: self.round,
            total_rounds: self.rules.total_rounds,
            agents: self.agents.clone(),
            candles: self.candles.iter().filter(|c| c.revealed).cloned().collect(),
            revealed_count: self.revealed_count(),
            total_candles: self.candles.len(),
            trade_count: self.trade_logs.len(),
            can_start_round: self.can_start_round(),
            is_game_over: self.is_game_over(),
            champion: if self.is_game_over() {
                leaderboard::champion(&self.agents)
            } else {
                None
            },
        }
    }

    // ── Reducer ───────────────────────────────────────────────────────────────

    /// Apply one command. On error nothing has changed.
    pub fn apply(
        &mut self,
        command: GameCommand,
        now: DateTime<Utc>,
    ) -> Result<Vec<GameEvent>, GameError> {
        let events = match command {
            GameCommand::StartRound => self.start_round(now)?,
            GameCommand::PlaceTrades => self.place_trades(now)?,
            GameCommand::RevealNext => self.reveal_next()?,
            GameCommand::CompleteRound => self.complete_round(now)?,
            GameCommand::Reset => self.reset(now),
        };

        debug!(
            ?command,
            phase = ?self.phase,
            round = self.round,
            revealed = self.revealed_count(),
            "Command applied"
        );
        Ok(events)
    }

    fn ensure_phase(&self, command: GameCommand, allowed: &[GamePhase]) -> Result<(), GameError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition { command, phase: self.phase })
        }
    }

    fn round_candles(&mut self, now: DateTime<Utc>) -> Vec<Candle> {
        market::generate_candles_for_round(
            &mut self.rng,
            self.round,
            self.rules.candles_per_round,
            self.rules.volatility,
            now,
        )
    }

    fn start_round(&mut self, now: DateTime<Utc>) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_phase(GameCommand::StartRound, &[GamePhase::Idle, GamePhase::RoundComplete])?;
        if self.rules.candles_per_round == 0 {
            return Err(GameError::EmptyRound);
        }

        self.candles = self.round_candles(now);
        self.run += 1;
        self.phase = GamePhase::RoundStarting;

        info!(round = self.round, candles = self.candles.len(), "🏁 Round starting");

        Ok(vec![GameEvent::RoundStarted {
            round: self.round,
            total_rounds: self.rules.total_rounds,
            candles: self.candles.len(),
            base_price: market::base_price_for_round(self.round),
        }])
    }

    fn place_trades(&mut self, now: DateTime<Utc>) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_phase(GameCommand::PlaceTrades, &[GamePhase::RoundStarting])?;
        let price = self.candles.first().map(|c| c.open).ok_or(GameError::EmptyRound)?;

        let trades = pnl::generate_trades(&mut self.rng, &self.agents, self.round, price, now);
        pnl::apply_trades(&mut self.agents, &trades);
        self.trade_logs.extend(trades.iter().cloned());
        self.phase = GamePhase::RevealingCandles;

        info!(round = self.round, price, trades = trades.len(), "🤖 Agents placed their trades");

        Ok(vec![GameEvent::TradesPlaced {
            round: self.round,
            trades,
            agents: self.agents.clone(),
        }])
    }

    fn reveal_next(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_phase(GameCommand::RevealNext, &[GamePhase::RevealingCandles])?;

        let index = self.revealed_count();
        if index >= self.candles.len() {
            return Err(GameError::AllCandlesRevealed);
        }

        self.candles[index].reveal();
        let previous = index.checked_sub(1).map(|i| &self.candles[i]);
        pnl::apply_candle(&mut self.agents, &self.candles[index], previous);

        let is_last = index + 1 == self.candles.len();
        debug!(round = self.round, index, is_last, close = self.candles[index].close, "🕯️ Candle revealed");

        Ok(vec![GameEvent::CandleRevealed {
            round: self.round,
            index,
            is_last,
            candle: self.candles[index].clone(),
            agents: self.agents.clone(),
        }])
    }

    fn complete_round(&mut self, now: DateTime<Utc>) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_phase(GameCommand::CompleteRound, &[GamePhase::RevealingCandles])?;
        if !self.all_revealed() {
            return Err(GameError::CandlesPending {
                revealed: self.revealed_count(),
                total: self.candles.len(),
            });
        }

        let price = self.candles.last().map(|c| c.close).ok_or(GameError::EmptyRound)?;
        let closes = pnl::close_positions(&mut self.agents, self.round, price, now);
        self.trade_logs.extend(closes.iter().cloned());

        let finished = self.round;
        let mut events = Vec::with_capacity(2);

        if finished >= self.rules.total_rounds {
            self.phase = GamePhase::GameOver;
            events.push(GameEvent::RoundComplete {
                round: finished,
                next_round: None,
                closes,
                agents: self.agents.clone(),
            });

            let standings = leaderboard::standings(&self.agents);
            if let Some(champion) = standings.first().cloned() {
                info!(
                    champion = %champion.name,
                    balance = champion.balance,
                    pnl_percent = champion.pnl_percent,
                    "🏆 Championship complete"
                );
                events.push(GameEvent::GameOver { champion, standings });
            }
        } else {
            self.round += 1;
            self.phase = GamePhase::RoundComplete;
            info!(round = finished, next_round = self.round, "✅ Round complete — positions closed");
            events.push(GameEvent::RoundComplete {
                round: finished,
                next_round: Some(self.round),
                closes,
                agents: self.agents.clone(),
            });
        }

        Ok(events)
    }

    fn reset(&mut self, now: DateTime<Utc>) -> Vec<GameEvent> {
        if let Some(seed) = self.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.game_id = Uuid::new_v4();
        self.epoch += 1;
        self.phase = GamePhase::Idle;
        self.round = 1;
        self.agents = default_roster(self.rules.initial_balance);
        self.trade_logs.clear();
        self.candles = self.round_candles(now);

        info!(game_id = %self.game_id, epoch = self.epoch, "🔄 Game reset");

        vec![GameEvent::GameReset { game_id: self.game_id, epoch: self.epoch }]
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
