//! Domain models shared across the entire Arena system.

pub mod agent;
pub mod candle;
pub mod trade;

pub use agent::{default_roster, Agent, Position};
pub use candle::Candle;
pub use trade::{TradeAction, TradeLog};
