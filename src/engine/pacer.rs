//! # engine::pacer
//!
//! **Pacer** — drives a round forward on fixed timers so the reveal has some
//! drama to it:
//!
//! ```text
//! StartRound ──1s──▶ PlaceTrades ──2s──▶ RevealNext ──2s──▶ … ──▶ last reveal ──1s──▶ CompleteRound
//! ```
//!
//! Every step is bound to the [`PaceKey`] the round had when it started. A
//! reset or a newer `StartRound` replaces the key, so a pacer left over from
//! an earlier round or game stops at its next step.
//! Rejected steps (for example a manual reveal already took the last candle)
//! end the pacer quietly.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::engine::game::{GameCommand, PaceKey};
use crate::events::GameEvent;
use crate::state::SharedState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    /// `StartRound` → `PlaceTrades`.
    pub start_delay: Duration,
    /// Gap between automatic reveals.
    pub reveal_interval: Duration,
    /// Last reveal → `CompleteRound`.
    pub close_delay: Duration,
    /// When `false`, candles are only revealed through the API.
    pub auto_reveal: bool,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_millis(1000),
            reveal_interval: Duration::from_millis(2000),
            close_delay: Duration::from_millis(1000),
            auto_reveal: true,
        }
    }
}

/// True when `events` contain the reveal of a round's final candle.
pub fn reveals_last_candle(events: &[GameEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, GameEvent::CandleRevealed { is_last: true, .. }))
}

/// Run [`run_round`] in the background.
pub fn spawn_round(state: SharedState, key: PaceKey) {
    tokio::spawn(async move { run_round(&state, key).await });
}

/// Run [`finish_round`] in the background.
pub fn spawn_finish(state: SharedState, key: PaceKey) {
    tokio::spawn(async move { finish_round(&state, key).await });
}

/// Place trades, then (with auto-reveal on) reveal candles until the last
/// one and close the round.
pub async fn run_round(state: &SharedState, key: PaceKey) {
    sleep(state.pacing.start_delay).await;
    if step(state, key, GameCommand::PlaceTrades).await.is_none() {
        return;
    }

    if !state.pacing.auto_reveal {
        debug!(?key, "Auto-reveal off — waiting for manual reveals");
        return;
    }

    loop {
        sleep(state.pacing.reveal_interval).await;
        let Some(events) = step(state, key, GameCommand::RevealNext).await else {
            return;
        };
        if reveals_last_candle(&events) {
            break;
        }
    }

    finish_round(state, key).await;
}

/// Wait out the close delay, then close positions and end the round.
pub async fn finish_round(state: &SharedState, key: PaceKey) {
    sleep(state.pacing.close_delay).await;
    step(state, key, GameCommand::CompleteRound).await;
}

/// One paced command. `None` means the pacer should stop.
async fn step(state: &SharedState, key: PaceKey, command: GameCommand) -> Option<Vec<GameEvent>> {
    match state.dispatch_paced(key, command).await {
        Ok(Some(events)) => Some(events),
        Ok(None) => {
            info!(?key, ?command, "⏹️ Round was replaced — pacer stopped");
            None
        }
        Err(err) => {
            debug!(?key, ?command, error = %err, "Pacer step rejected — stopping");
            None
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game::{GamePhase, GameRules};
    use crate::state::build_state;

    fn instant() -> PacingConfig {
        PacingConfig {
            start_delay: Duration::ZERO,
            reveal_interval: Duration::ZERO,
            close_delay: Duration::ZERO,
            auto_reveal: true,
        }
    }

    #[tokio::test]
    async fn test_paced_round_runs_to_completion() {
        let state = build_state(GameRules::default(), Some(9), instant());
        let key = state.dispatch(GameCommand::StartRound).await.unwrap().key;

        run_round(&state, key).await;

        let game = state.game.read().await;
        assert_eq!(game.phase(), GamePhase::RoundComplete);
        assert_eq!(game.round(), 2);
        assert!(game.all_revealed());
        assert_eq!(game.trade_logs().len(), 10);
    }

    #[tokio::test]
    async fn test_stale_epoch_stops_pacer() {
        let state = build_state(GameRules::default(), Some(9), instant());
        let key = state.dispatch(GameCommand::StartRound).await.unwrap().key;
        state.dispatch(GameCommand::Reset).await.unwrap();

        run_round(&state, key).await;

        let game = state.game.read().await;
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.trade_logs().is_empty());
    }

    #[tokio::test]
    async fn test_manual_mode_stops_after_trades() {
        let pacing = PacingConfig { auto_reveal: false, ..instant() };
        let state = build_state(GameRules::default(), Some(9), pacing);
        let key = state.dispatch(GameCommand::StartRound).await.unwrap().key;

        run_round(&state, key).await;

        let game = state.game.read().await;
        assert_eq!(game.phase(), GamePhase::RevealingCandles);
        assert_eq!(game.revealed_count(), 0);
    }

    #[tokio::test]
    async fn test_earlier_round_pacer_leaves_next_round_alone() {
        let pacing = PacingConfig { reveal_interval: Duration::from_millis(300), ..instant() };
        let state = build_state(GameRules::default(), Some(9), pacing);

        let key = state.dispatch(GameCommand::StartRound).await.unwrap().key;
        let pacer = {
            let state = state.clone();
            tokio::spawn(async move { run_round(&state, key).await })
        };

        // Round 1 finishes by hand while its pacer sleeps between reveals.
        for _ in 0..200 {
            if state.game.read().await.phase() == GamePhase::RevealingCandles {
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        for _ in 0..10 {
            state.dispatch(GameCommand::RevealNext).await.unwrap();
        }
        state.dispatch(GameCommand::CompleteRound).await.unwrap();
        state.dispatch(GameCommand::StartRound).await.unwrap();
        state.dispatch(GameCommand::PlaceTrades).await.unwrap();

        pacer.await.unwrap();

        let game = state.game.read().await;
        assert_eq!(game.round(), 2);
        assert_eq!(game.phase(), GamePhase::RevealingCandles);
        assert_eq!(game.revealed_count(), 0);
    }
}
