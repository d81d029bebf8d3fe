//! # routes::trades
//!
//! `GET /api/trades` — the trade history, grouped by round (ascending).
//! Every round of the game has a slot, empty until it is played.
//! `?round=N` narrows it to one round.

use std::{collections::BTreeMap, ops::RangeInclusive};

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, models::TradeLog, state::SharedState};

#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    pub round: Option<u32>,
}

/// Group logs into the given round slots, keeping insertion order inside
/// each round. Logs outside `slots` are dropped.
pub fn group_by_round<'a, I>(logs: I, slots: RangeInclusive<u32>) -> BTreeMap<u32, Vec<TradeLog>>
where
    I: IntoIterator<Item = &'a TradeLog>,
{
    let mut rounds: BTreeMap<u32, Vec<TradeLog>> =
        slots.clone().map(|round| (round, Vec::new())).collect();
    for log in logs.into_iter().filter(|log| slots.contains(&log.round)) {
        rounds.entry(log.round).or_default().push(log.clone());
    }
    rounds
}

pub async fn get_trades(
    State(state): State<SharedState>,
    Query(query): Query<TradesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let game = state.game.read().await;
    let total_rounds = game.rules().total_rounds;

    let slots = match query.round {
        Some(round) if round == 0 || round > total_rounds => {
            return Err(AppError::BadRequest(format!(
                "round must be between 1 and {total_rounds}, got {round}"
            )));
        }
        Some(round) => round..=round,
        None => 1..=total_rounds,
    };

    let rounds = group_by_round(game.trade_logs(), slots);
    let count: usize = rounds.values().map(Vec::len).sum();

    Ok(Json(json!({
        "ok":     true,
        "count":  count,
        "rounds": rounds,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Agent, TradeAction};
    use chrono::Utc;

    #[test]
    fn test_group_by_round_sorts_rounds() {
        let agent = Agent::new("a", "A", "🤖", 100_000.0);
        let now = Utc::now();
        let logs = vec![
            TradeLog::new(&agent, TradeAction::Long, 10.0, 1.0, 2, now),
            TradeLog::new(&agent, TradeAction::Short, 20.0, 1.0, 1, now),
            TradeLog::new(&agent, TradeAction::Close, 20.0, 1.0, 1, now),
        ];

        let grouped = group_by_round(&logs, 1..=3);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(grouped[&1][0].action, TradeAction::Short);
        assert_eq!(grouped[&1][1].action, TradeAction::Close);
        assert!(grouped[&3].is_empty());
    }

    #[test]
    fn test_group_by_round_single_slot() {
        let agent = Agent::new("a", "A", "🤖", 100_000.0);
        let now = Utc::now();
        let logs = vec![
            TradeLog::new(&agent, TradeAction::Long, 10.0, 1.0, 1, now),
            TradeLog::new(&agent, TradeAction::Short, 20.0, 1.0, 2, now),
        ];

        let grouped = group_by_round(&logs, 2..=2);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&2].len(), 1);
        assert_eq!(grouped[&2][0].action, TradeAction::Short);
    }
}
