//! # Arena server
//!
//! Configuration comes from the environment (see [`arena::config`]); `.env`
//! is loaded first when present.
//!
//! | Variable   | Default                        | Description     |
//! |------------|--------------------------------|-----------------|
//! | `RUST_LOG` | `arena=debug,tower_http=info`  | Tracing filter  |

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arena::{build_router, config::ArenaConfig, state::build_state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("arena=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════════════╗
  ║           ARENA — AI Trading Championship             ║
  ║     5 agents · 5 rounds · 10 candles per round        ║
  ╚═══════════════════════════════════════════════════════╝"#);

    // ── 3. Config ─────────────────────────────────────────────────────────────
    let config = ArenaConfig::from_env()?;
    info!(
        seed = ?config.seed,
        rounds = config.rules.total_rounds,
        candles = config.rules.candles_per_round,
        auto_reveal = config.pacing.auto_reveal,
        "⚙️ Arena configured"
    );

    // ── 4. Shared state & router ──────────────────────────────────────────────
    let state = build_state(config.rules, config.seed, config.pacing);
    let app = build_router(state);

    // ── 5. Bind & Serve ───────────────────────────────────────────────────────
    info!(addr = ?config.bind_addr, "🚀 Arena server starting");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
