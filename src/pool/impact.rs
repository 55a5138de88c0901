//! Migration Impact Report
//!
//! Quotes the same trade against the pre- and post-migration pools and
//! compares the slippage. The escalation ratio is only produced when the
//! pre-migration impact is non-zero.
//!
//! Created: 2026-10-17

use super::calculator::{PriceCalculator, TradeQuote};
use super::state::PoolState;
use crate::error::{ForensicsError, Result};
use crate::types::ProtocolParams;
use serde::Serialize;
use tracing::debug;

/// Pre/post migration comparison for one trade size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactSummary {
    pub sol_in: f64,
    pub pre: TradeQuote,
    pub post: TradeQuote,
    pub pre_impact_pct: f64,
    pub post_impact_pct: f64,
    /// post_impact_pct / pre_impact_pct
    pub escalation_ratio: f64,
}

impl ImpactSummary {
    /// How much more volatile the migrated pool is, in percent
    pub fn volatility_increase_pct(&self) -> f64 {
        (self.escalation_ratio - 1.0) * 100.0
    }
}

/// Build both pools from `params` and compare a `sol_in` buy
pub fn summarize(params: &ProtocolParams, sol_in: f64) -> Result<ImpactSummary> {
    let pre = PriceCalculator::quote(&PoolState::pre_migration(params), sol_in)?;
    let post = PriceCalculator::quote(&PoolState::post_migration(params), sol_in)?;

    // sol_in can vanish against the reserve in f64 (115 + 1e-20 == 115)
    if pre.price_impact_pct == 0.0 {
        return Err(ForensicsError::DivideByZeroImpact { sol_in });
    }

    let escalation_ratio = post.price_impact_pct / pre.price_impact_pct;
    debug!(
        sol_in,
        pre_impact_pct = pre.price_impact_pct,
        post_impact_pct = post.price_impact_pct,
        escalation_ratio,
        "impact summary"
    );

    Ok(ImpactSummary {
        sol_in,
        pre,
        post,
        pre_impact_pct: pre.price_impact_pct,
        post_impact_pct: post.price_impact_pct,
        escalation_ratio,
    })
}

/// One summary per trade size, in the order given. The first failing size aborts.
pub fn impact_matrix(params: &ProtocolParams, sizes: &[f64]) -> Result<Vec<ImpactSummary>> {
    sizes.iter().map(|&sol_in| summarize(params, sol_in)).collect()
}
