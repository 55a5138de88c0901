//! Bonding Curve Pool State
//!
//! Constant-product reserve snapshot. Pre- and post-migration are two
//! distinct values built from the same `ProtocolParams`; the migration
//! removes only the virtual SOL credit, the token side is unchanged.
//!
//! Created: 2026-10-17

use crate::error::{ForensicsError, Result};
use crate::types::ProtocolParams;
use serde::Serialize;

/// Immutable constant-product reserves
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolState {
    /// Effective SOL reserve (net of the virtual advance once migrated)
    pub sol_reserve: f64,
    pub token_reserve: f64,
    pub migrated: bool,
}

impl PoolState {
    pub fn new(sol_reserve: f64, token_reserve: f64, migrated: bool) -> Self {
        Self {
            sol_reserve,
            token_reserve,
            migrated,
        }
    }

    /// Curve as priced before graduation: real SOL plus the virtual advance
    pub fn pre_migration(params: &ProtocolParams) -> Self {
        Self::new(params.pre_migration_sol(), params.migration_pack, false)
    }

    /// Pool after the virtual advance has been withdrawn
    pub fn post_migration(params: &ProtocolParams) -> Self {
        Self::new(params.real_sol_reserve, params.migration_pack, true)
    }

    /// k = sol_reserve * token_reserve
    pub fn constant_product(&self) -> f64 {
        self.sol_reserve * self.token_reserve
    }

    /// Spot price in SOL per token
    pub fn spot_price(&self) -> f64 {
        if self.token_reserve == 0.0 {
            return 0.0;
        }
        self.sol_reserve / self.token_reserve
    }

    /// Both reserves must be finite and strictly positive to be quoted against
    pub fn ensure_valid(&self) -> Result<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.sol_reserve) && valid(self.token_reserve) {
            Ok(())
        } else {
            Err(ForensicsError::InvalidPoolState {
                sol_reserve: self.sol_reserve,
                token_reserve: self.token_reserve,
            })
        }
    }
}
