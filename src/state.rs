//! # state
//!
//! The arena's **shared application state** — the single source of truth that
//! HTTP handlers, the pacer and WebSocket clients share.
//!
//! * `Arc<AppState>` is cloned cheaply into every Axum handler via
//!   `axum::extract::State`.
//! * The [`Game`] sits behind a `tokio::sync::RwLock`. Every command holds the
//!   write lock for exactly one reducer step; snapshots take the read lock.
//! * Events are broadcast while the write lock is still held, so clients see
//!   them in the same order the reducer produced them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::warn;

use crate::engine::game::{Game, GameCommand, GameRules, GameSnapshot, PaceKey};
use crate::engine::pacer::PacingConfig;
use crate::error::GameError;
use crate::events::GameEvent;

/// Outcome of an accepted command: the events it produced and the pace key
/// the game holds afterwards.
#[derive(Debug)]
pub struct Dispatched {
    pub key: PaceKey,
    pub events: Vec<GameEvent>,
}

// ─── AppState ─────────────────────────────────────────────────────────────────

/// Top-level shared state injected into every Axum handler.
pub struct AppState {
    pub game: RwLock<Game>,

    /// Pre-serialised [`GameEvent`] JSON for WebSocket clients.
    pub broadcast_tx: broadcast::Sender<String>,

    pub pacing: PacingConfig,

    /// Commands the reducer accepted this session. Monotonically increasing.
    pub command_count: AtomicU64,
}

impl AppState {
    pub fn new(rules: GameRules, seed: Option<u64>, pacing: PacingConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);

        Self {
            game: RwLock::new(Game::new(rules, seed, Utc::now())),
            broadcast_tx,
            pacing,
            command_count: AtomicU64::new(0),
        }
    }

    /// Broadcast to every WebSocket client. A send with no listeners is not
    /// an error.
    pub fn broadcast(&self, event: &GameEvent) {
        let _ = self.broadcast_tx.send(event.to_json());
    }

    /// A snapshot plus a receiver for every event after it. Events are only
    /// sent under the write lock, so subscribing under the read lock leaves no
    /// gap and no overlap between the two.
    pub async fn subscribe_with_snapshot(&self) -> (GameSnapshot, broadcast::Receiver<String>) {
        let game = self.game.read().await;
        let rx = self.broadcast_tx.subscribe();
        (game.snapshot(), rx)
    }

    /// Apply `command` to the game and broadcast the resulting events.
    pub async fn dispatch(&self, command: GameCommand) -> Result<Dispatched, GameError> {
        let mut game = self.game.write().await;
        let events = self.apply_locked(&mut game, command)?;
        Ok(Dispatched { key: game.pace_key(), events })
    }

    /// Like [`dispatch`](Self::dispatch), but only while the game still holds
    /// `key`. Returns `Ok(None)` once a reset or a newer round has replaced it.
    pub async fn dispatch_paced(
        &self,
        key: PaceKey,
        command: GameCommand,
    ) -> Result<Option<Vec<GameEvent>>, GameError> {
        let mut game = self.game.write().await;
        if game.pace_key() != key {
            return Ok(None);
        }
        self.apply_locked(&mut game, command).map(Some)
    }

    fn apply_locked(&self, game: &mut Game, command: GameCommand) -> Result<Vec<GameEvent>, GameError> {
        match game.apply(command, Utc::now()) {
            Ok(events) => {
                self.command_count.fetch_add(1, Ordering::Relaxed);
                for event in &events {
                    self.broadcast(event);
                }
                Ok(events)
            }
            Err(err) => {
                warn!(?command, phase = ?game.phase(), error = %err, "Command rejected");
                Err(err)
            }
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(rules: GameRules, seed: Option<u64>, pacing: PacingConfig) -> SharedState {
    Arc::new(AppState::new(rules, seed, pacing))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
