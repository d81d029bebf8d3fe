//! # engine::market
//!
//! **Candle Generator** — the synthetic price feed every round is played on.
//!
//! Each candle is one step of a random walk around the round's base price:
//!
//! ```text
//! v      = base_price × volatility
//! open   = previous close           (first open = base_price)
//! close  = open + (u − 0.5) × v
//! high   = max(open, close) + u × v × 0.5
//! low    = min(open, close) − u × v × 0.5
//! volume = u × 1000 + 500
//! ```
//!
//! The RNG is passed in so a seeded [`rand::rngs::StdRng`] replays the exact
//! same market.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::models::Candle;

/// Default walk volatility (2% of base price per step).
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Candle width. Timestamps are laid out back from `end` in these steps.
const CANDLE_MINUTES: i64 = 1;

/// Base price for a round of the championship (ETH-like range).
pub fn base_price_for_round(round: u32) -> f64 {
    match round {
        1 => 2200.0,
        2 => 2250.0,
        3 => 2220.0,
        4 => 2180.0,
        5 => 2210.0,
        _ => 2200.0,
    }
}

/// Generate `count` hidden candles starting at `base_price`.
///
/// Candle `i` is stamped `end − (count − i)` minutes so the last candle closes
/// one minute before `end`.
pub fn generate_candles<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    base_price: f64,
    volatility: f64,
    end: DateTime<Utc>,
) -> Vec<Candle> {
    let step = base_price * volatility;
    let mut last_close = base_price;

    (0..count)
        .map(|i| {
            let open = last_close;
            let close = open + (rng.gen::<f64>() - 0.5) * step;
            let high = open.max(close) + rng.gen::<f64>() * step * 0.5;
            let low = open.min(close) - rng.gen::<f64>() * step * 0.5;
            let volume = rng.gen::<f64>() * 1000.0 + 500.0;
            last_close = close;

            Candle {
                open,
                high,
                low,
                close,
                volume,
                timestamp: end - Duration::minutes((count - i) as i64 * CANDLE_MINUTES),
                revealed: false,
            }
        })
        .collect()
}

/// Candles for `round`, using that round's base price.
pub fn generate_candles_for_round<R: Rng + ?Sized>(
    rng: &mut R,
    round: u32,
    count: usize,
    volatility: f64,
    end: DateTime<Utc>,
) -> Vec<Candle> {
    generate_candles(rng, count, base_price_for_round(round), volatility, end)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
