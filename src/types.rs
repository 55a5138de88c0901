// Shared domain vocabulary: protocol parameters of the bonding curve
// and the migration program being watched.

use crate::error::{ForensicsError, Result};
use serde::{Deserialize, Serialize};

/// Pump.fun migration program (graduation authority)
pub const DEFAULT_MIGRATION_PROGRAM: &str = "39azUYFWPz3VHgKCf3VChUwbpURdCHRxjWVowf5jUJjg";

/// Explorer prefix; the signature is appended verbatim
pub const DEFAULT_EXPLORER_TX_URL: &str = "https://solscan.io/tx/";

/// Protocol parameters of the bonding curve.
///
/// Built once at startup (defaults, then TOML, then env/CLI overrides)
/// and passed by reference to the pricing model and the watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    /// SOL actually raised from traders at graduation
    pub real_sol_reserve: f64,
    /// Virtual SOL credit counted before migration, reclaimed at migration
    pub virtual_advance: f64,
    /// Total token supply
    pub total_supply: f64,
    /// Tokens seeded into the post-migration pool
    pub migration_pack: f64,
    /// Program whose logs are subscribed to
    pub migration_program: String,
    /// Explorer base URL for transaction references
    pub explorer_tx_url: String,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            real_sol_reserve: 85.0,
            virtual_advance: 30.0,
            total_supply: 1_073_000_000.0,
            migration_pack: 206_900_000.0,
            migration_program: DEFAULT_MIGRATION_PROGRAM.to_string(),
            explorer_tx_url: DEFAULT_EXPLORER_TX_URL.to_string(),
        }
    }
}

impl ProtocolParams {
    /// SOL reserve the curve prices against before migration
    pub fn pre_migration_sol(&self) -> f64 {
        self.real_sol_reserve + self.virtual_advance
    }

    /// Share of total supply seeded into the migrated pool (percent)
    pub fn migration_pack_pct(&self) -> f64 {
        if self.total_supply <= 0.0 {
            return 0.0;
        }
        self.migration_pack / self.total_supply * 100.0
    }

    /// Reference URL for a transaction signature
    pub fn tx_url(&self, signature: &str) -> String {
        format!("{}{}", self.explorer_tx_url, signature)
    }

    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("real_sol_reserve", self.real_sol_reserve),
            ("virtual_advance", self.virtual_advance),
            ("total_supply", self.total_supply),
            ("migration_pack", self.migration_pack),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ForensicsError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.migration_pack > self.total_supply {
            return Err(ForensicsError::InvalidConfig(format!(
                "migration_pack ({}) exceeds total_supply ({})",
                self.migration_pack, self.total_supply
            )));
        }
        if self.migration_program.trim().is_empty() {
            return Err(ForensicsError::InvalidConfig(
                "migration_program must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ProtocolParams::default();
        assert_eq!(params.pre_migration_sol(), 115.0);
        assert!(params.validate().is_ok());
        // ~19.28% of supply goes to the migrated pool
        assert!((params.migration_pack_pct() - 19.2824).abs() < 0.001);
    }

    #[test]
    fn test_tx_url_concatenates() {
        let params = ProtocolParams::default();
        assert_eq!(params.tx_url("5abc"), "https://solscan.io/tx/5abc");
    }

    #[test]
    fn test_validate_rejects_oversized_pack() {
        let params = ProtocolParams {
            migration_pack: 2_000_000_000.0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ForensicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let negative = ProtocolParams { virtual_advance: -1.0, ..Default::default() };
        assert!(negative.validate().is_err());

        let nan = ProtocolParams { real_sol_reserve: f64::NAN, ..Default::default() };
        assert!(nan.validate().is_err());
    }
}
