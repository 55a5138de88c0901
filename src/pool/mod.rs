//! Pool pricing module
//!
//! Constant-product reserve state, trade quoting, and the pre/post
//! migration impact comparison. Everything here is synchronous and pure.
//!
//! Created: 2026-10-17

pub mod calculator;
pub mod impact;
pub mod state;

pub use calculator::{PriceCalculator, TradeQuote};
pub use impact::{impact_matrix, summarize, ImpactSummary};
pub use state::PoolState;
