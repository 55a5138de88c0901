//! Price Calculator
//!
//! Slippage for a SOL-in buy against a constant-product pool (x * y = k).
//! No swap fee is applied: the figures are an analytical approximation of
//! liquidity depth, not an on-chain quote.
//!
//! Created: 2026-10-17

use super::state::PoolState;
use crate::error::{ForensicsError, Result};
use serde::Serialize;
use tracing::debug;

/// Result of quoting one trade against one pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeQuote {
    pub sol_in: f64,
    pub tokens_out: f64,
    /// Share of the token reserve consumed by the trade (percent)
    pub price_impact_pct: f64,
    pub new_sol_reserve: f64,
    pub new_token_reserve: f64,
}

impl TradeQuote {
    /// Average execution price in SOL per token
    pub fn execution_price(&self) -> f64 {
        if self.tokens_out == 0.0 {
            return 0.0;
        }
        self.sol_in / self.tokens_out
    }
}

/// Price calculator for bonding curve pools
pub struct PriceCalculator;

impl PriceCalculator {
    /// Quote `sol_in` SOL against `pool`.
    ///
    /// Formula:
    ///   k = sol * tokens
    ///   new_tokens = k / (sol + sol_in)
    ///   tokens_out = tokens - new_tokens
    ///   impact = tokens_out / tokens * 100
    pub fn quote(pool: &PoolState, sol_in: f64) -> Result<TradeQuote> {
        if !sol_in.is_finite() || sol_in <= 0.0 {
            return Err(ForensicsError::InvalidTradeSize(sol_in));
        }
        pool.ensure_valid()?;

        let k = pool.constant_product();
        let new_sol_reserve = pool.sol_reserve + sol_in;
        let new_token_reserve = k / new_sol_reserve;
        let tokens_out = pool.token_reserve - new_token_reserve;
        let price_impact_pct = (tokens_out / pool.token_reserve) * 100.0;

        debug!(
            migrated = pool.migrated,
            sol_in,
            tokens_out,
            price_impact_pct,
            "quoted trade"
        );

        Ok(TradeQuote {
            sol_in,
            tokens_out,
            price_impact_pct,
            new_sol_reserve,
            new_token_reserve,
        })
    }
}
