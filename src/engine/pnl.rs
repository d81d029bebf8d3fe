//! # engine::pnl
//!
//! P&L bookkeeping for the arena: how agents open positions at round start,
//! how each revealed candle moves their balances, and how positions are
//! flattened when the round ends.
//!
//! Every function takes the agent list by `&mut` slice and works per agent.
//! Agents never influence each other, so balances diverge independently
//! (the game is not zero-sum).

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::models::{Agent, Candle, Position, TradeAction, TradeLog};

/// Smallest fraction of balance an agent commits to a round.
pub const MIN_POSITION_FRACTION: f64 = 0.1;
/// Largest fraction of balance an agent commits to a round.
pub const MAX_POSITION_FRACTION: f64 = 0.6;

// ─── Round Start ──────────────────────────────────────────────────────────────

/// Each agent flips a coin for direction and commits 10–60% of its current
/// balance, floored to a whole unit, at `price`.
pub fn generate_trades<R: Rng + ?Sized>(
    rng: &mut R,
    agents: &[Agent],
    round: u32,
    price: f64,
    now: DateTime<Utc>,
) -> Vec<TradeLog> {
    let spread = MAX_POSITION_FRACTION - MIN_POSITION_FRACTION;

    agents
        .iter()
        .map(|agent| {
            let position = if rng.gen_bool(0.5) { Position::Long } else { Position::Short };
            let fraction = rng.gen::<f64>() * spread + MIN_POSITION_FRACTION;
            let amount = (agent.balance * fraction).floor();

            TradeLog::new(agent, position.into(), amount, price, round, now)
        })
        .collect()
}

/// Install the positions described by `trades`. Agents without a matching
/// trade keep whatever they had.
pub fn apply_trades(agents: &mut [Agent], trades: &[TradeLog]) {
    for agent in agents.iter_mut() {
        let Some(trade) = trades.iter().find(|t| t.agent_id == agent.id) else {
            continue;
        };
        if let Some(position) = trade.opened_position() {
            agent.position = Some(position);
            agent.position_size = trade.amount;
        }
    }
}

// ─── Candle Reveal ────────────────────────────────────────────────────────────

/// Mark every exposed agent to market for the move `previous → candle`.
///
/// `pnl = position_size × change × exposure`, where `exposure` is `+1` for
/// long and `−1` for short. With no previous candle nothing moves.
pub fn apply_candle(agents: &mut [Agent], candle: &Candle, previous: Option<&Candle>) {
    let Some(previous) = previous else {
        return;
    };
    let change = candle.change_from(previous);

    for agent in agents.iter_mut().filter(|a| a.has_exposure()) {
        let Some(position) = agent.position else { continue };
        let pnl = agent.position_size * change * position.exposure();
        agent.set_balance(agent.balance + pnl);

        debug!(
            agent_id = %agent.id,
            ?position,
            change,
            pnl,
            balance = agent.balance,
            "Marked to market"
        );
    }
}

// ─── Round End ────────────────────────────────────────────────────────────────

/// Flatten every agent and return one `CLOSE` log per agent.
///
/// The log carries the size that was actually closed, read before the
/// position is cleared.
pub fn close_positions(
    agents: &mut [Agent],
    round: u32,
    price: f64,
    now: DateTime<Utc>,
) -> Vec<TradeLog> {
    agents
        .iter_mut()
        .map(|agent| {
            let log = TradeLog::new(agent, TradeAction::Close, agent.position_size, price, round, now);
            agent.position = None;
            agent.position_size = 0.0;
            log
        })
        .collect()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_roster;
    use rand::{rngs::StdRng, SeedableRng};

    fn now() -> DateTime<Utc> {
        "2025-01-01T12:00:00Z".parse().unwrap()
    }

    fn candle(close: f64) -> Candle {
        Candle {
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
            timestamp: now(),
            revealed: true,
        }
    }

    fn with_position(mut agent: Agent, position: Position, size: f64) -> Agent {
        agent.position = Some(position);
        agent.position_size = size;
        agent
    }

    #[test]
    fn test_long_gains_on_rise() {
        let mut agents = vec![with_position(Agent::new("a", "A", "🤖", 100_000.0), Position::Long, 50_000.0)];
        apply_candle(&mut agents, &candle(2244.0), Some(&candle(2200.0)));

        // +2% on 50k = +1000
        assert!((agents[0].balance - 101_000.0).abs() < 1e-6);
        assert!((agents[0].pnl_percent - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_gains_on_fall() {
        let mut agents = vec![with_position(Agent::new("a", "A", "🤖", 100_000.0), Position::Short, 20_000.0)];
        apply_candle(&mut agents, &candle(2156.0), Some(&candle(2200.0)));

        // −2% move, short 20k = +400
        assert!((agents[0].balance - 100_400.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_previous_candle_is_noop() {
        let mut agents = vec![with_position(Agent::new("a", "A", "🤖", 100_000.0), Position::Long, 50_000.0)];
        apply_candle(&mut agents, &candle(3000.0), None);
        assert_eq!(agents[0].balance, 100_000.0);
    }

    #[test]
    fn test_flat_agents_untouched() {
        let mut agents = vec![
            Agent::new("a", "A", "🤖", 100_000.0),
            with_position(Agent::new("b", "B", "🧠", 100_000.0), Position::Long, 0.0),
        ];
        apply_candle(&mut agents, &candle(2300.0), Some(&candle(2200.0)));
        assert_eq!(agents[0].balance, 100_000.0);
        assert_eq!(agents[1].balance, 100_000.0);
    }

    #[test]
    fn test_balances_diverge_not_zero_sum() {
        let mut agents = vec![
            with_position(Agent::new("a", "A", "🤖", 100_000.0), Position::Long, 60_000.0),
            with_position(Agent::new("b", "B", "🧠", 100_000.0), Position::Long, 10_000.0),
            with_position(Agent::new("c", "C", "💡", 100_000.0), Position::Short, 30_000.0),
        ];
        apply_candle(&mut agents, &candle(2310.0), Some(&candle(2200.0)));

        let total_pnl: f64 = agents.iter().map(|a| a.balance - a.initial_balance).sum();
        assert!(total_pnl.abs() > 1.0);
        assert!(agents[0].balance > agents[1].balance);
        assert!(agents[2].balance < agents[2].initial_balance);
    }

    #[test]
    fn test_generated_sizes_within_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let agents = default_roster(100_000.0);

        for round in 1..=50 {
            let trades = generate_trades(&mut rng, &agents, round, 2200.0, now());
            assert_eq!(trades.len(), agents.len());
            for trade in &trades {
                assert!(trade.amount >= 10_000.0 && trade.amount <= 60_000.0);
                assert_eq!(trade.amount, trade.amount.floor());
                assert_ne!(trade.action, TradeAction::Close);
                assert_eq!(trade.price, 2200.0);
                assert_eq!(trade.round, round);
            }
        }
    }

    #[test]
    fn test_apply_trades_sets_positions() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut agents = default_roster(100_000.0);
        let trades = generate_trades(&mut rng, &agents, 1, 2200.0, now());
        apply_trades(&mut agents, &trades);

        for (agent, trade) in agents.iter().zip(&trades) {
            assert_eq!(agent.position, trade.opened_position());
            assert_eq!(agent.position_size, trade.amount);
        }
    }

    #[test]
    fn test_close_logs_carry_closed_size() {
        let mut agents = vec![
            with_position(Agent::new("a", "A", "🤖", 100_000.0), Position::Long, 42_000.0),
            Agent::new("b", "B", "🧠", 100_000.0),
        ];
        let logs = close_positions(&mut agents, 3, 2250.0, now());

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, TradeAction::Close);
        assert_eq!(logs[0].amount, 42_000.0);
        assert_eq!(logs[0].price, 2250.0);
        assert_eq!(logs[1].amount, 0.0);
        assert!(agents.iter().all(|a| a.position.is_none() && a.position_size == 0.0));
    }
}
