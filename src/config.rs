//! # config — Arena settings from environment variables
//!
//! | Variable                | Default        | Description                          |
//! |-------------------------|----------------|--------------------------------------|
//! | `BIND_ADDR`             | `0.0.0.0:3000` | Address Axum listens on              |
//! | `ARENA_SEED`            | *(entropy)*    | Fixed seed → reproducible championship |
//! | `ARENA_ROUNDS`          | `5`            | Rounds per championship              |
//! | `ARENA_CANDLES`         | `10`           | Candles revealed per round           |
//! | `ARENA_INITIAL_BALANCE` | `100000`       | Starting balance of every agent      |
//! | `ARENA_VOLATILITY`      | `0.02`         | Random-walk step (fraction of price) |
//! | `ARENA_START_DELAY_MS`  | `1000`         | Round start → trades placed          |
//! | `ARENA_REVEAL_MS`       | `2000`         | Gap between automatic reveals        |
//! | `ARENA_CLOSE_DELAY_MS`  | `1000`         | Last reveal → positions closed       |
//! | `ARENA_AUTO_REVEAL`     | `true`         | `false` = reveals only via the API   |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::engine::{game::GameRules, pacer::PacingConfig};

#[derive(Debug, Clone)]
pub struct ArenaConfig {
    pub bind_addr: SocketAddr,
    pub seed: Option<u64>,
    pub rules: GameRules,
    pub pacing: PacingConfig,
}

impl ArenaConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GameRules::default();
        let pacing = PacingConfig::default();

        let rules = GameRules {
            total_rounds: parse_or(&lookup, "ARENA_ROUNDS", defaults.total_rounds)?,
            candles_per_round: parse_or(&lookup, "ARENA_CANDLES", defaults.candles_per_round)?,
            initial_balance: parse_or(&lookup, "ARENA_INITIAL_BALANCE", defaults.initial_balance)?,
            volatility: parse_or(&lookup, "ARENA_VOLATILITY", defaults.volatility)?,
            ..defaults
        };

        if rules.total_rounds == 0 {
            bail!("ARENA_ROUNDS must be at least 1");
        }
        if rules.candles_per_round == 0 {
            bail!("ARENA_CANDLES must be at least 1");
        }
        if rules.initial_balance.is_nan() || rules.initial_balance <= 0.0 {
            bail!("ARENA_INITIAL_BALANCE must be positive");
        }
        if rules.volatility.is_nan() || rules.volatility < 0.0 {
            bail!("ARENA_VOLATILITY must not be negative");
        }

        let seed = match lookup("ARENA_SEED") {
            Some(raw) => Some(raw.trim().parse().context("ARENA_SEED must be an unsigned integer")?),
            None => None,
        };

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            seed,
            rules,
            pacing: PacingConfig {
                start_delay: millis_or(&lookup, "ARENA_START_DELAY_MS", pacing.start_delay)?,
                reveal_interval: millis_or(&lookup, "ARENA_REVEAL_MS", pacing.reveal_interval)?,
                close_delay: millis_or(&lookup, "ARENA_CLOSE_DELAY_MS", pacing.close_delay)?,
                auto_reveal: lookup("ARENA_AUTO_REVEAL")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(pacing.auto_reveal),
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

fn millis_or<F>(lookup: &F, key: &str, default: Duration) -> anyhow::Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let ms: u64 = parse_or(lookup, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<ArenaConfig> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ArenaConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.seed, None);
        assert_eq!(config.rules, GameRules::default());
        assert_eq!(config.pacing.start_delay, Duration::from_millis(1000));
        assert_eq!(config.pacing.reveal_interval, Duration::from_millis(2000));
        assert_eq!(config.pacing.close_delay, Duration::from_millis(1000));
        assert!(config.pacing.auto_reveal);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ARENA_SEED", "42"),
            ("ARENA_ROUNDS", "3"),
            ("ARENA_REVEAL_MS", "250"),
            ("ARENA_AUTO_REVEAL", "false"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.rules.total_rounds, 3);
        assert_eq!(config.rules.candles_per_round, 10);
        assert_eq!(config.pacing.reveal_interval, Duration::from_millis(250));
        assert!(!config.pacing.auto_reveal);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(load(&[("ARENA_ROUNDS", "0")]).is_err());
        assert!(load(&[("ARENA_CANDLES", "ten")]).is_err());
        assert!(load(&[("ARENA_INITIAL_BALANCE", "-5")]).is_err());
        assert!(load(&[("ARENA_SEED", "abc")]).is_err());
    }
}
