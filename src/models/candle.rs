//! # models::candle
//!
//! One OHLCV bar of the simulated market feed.
//!
//! Candles are generated a full round ahead of time and stay hidden until the
//! arena reveals them one by one. `revealed` only ever flips `false → true`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
    pub revealed: bool,
}

impl Candle {
    /// Mark the candle as visible. Idempotent.
    #[inline]
    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Signed close-to-close move relative to `previous`, as a fraction.
    #[inline]
    pub fn change_from(&self, previous: &Candle) -> f64 {
        if previous.close == 0.0 {
            return 0.0;
        }
        (self.close - previous.close) / previous.close
    }
}
