//! Shadow Tax Audit
//!
//! Net capital flow of a graduated token: swap fees taken during bonding,
//! the creator rebate paid back, and the virtual advance the protocol
//! reclaims at migration. Decimal arithmetic throughout so the SOL figures
//! add up exactly.
//!
//! Created: 2026-10-17

use crate::error::{ForensicsError, Result};
use crate::types::ProtocolParams;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Fee rates applied over the bonding phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeSchedule {
    /// Flat swap fee on the bonding curve (0.01 = 1%)
    pub swap_fee_rate: Decimal,
    /// Share of volume rebated to the creator (0.0005 = 0.05%)
    pub creator_rebate_rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            swap_fee_rate: Decimal::new(1, 2),
            creator_rebate_rate: Decimal::new(5, 4),
        }
    }
}

impl FeeSchedule {
    /// Build from float rates (config values). Rates must be within [0, 1].
    pub fn from_rates(swap_fee_rate: f64, creator_rebate_rate: f64) -> Result<Self> {
        Ok(Self {
            swap_fee_rate: rate_to_decimal("swap_fee_rate", swap_fee_rate)?,
            creator_rebate_rate: rate_to_decimal("creator_rebate_rate", creator_rebate_rate)?,
        })
    }
}

fn rate_to_decimal(name: &str, rate: f64) -> Result<Decimal> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(ForensicsError::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, rate
        )));
    }
    to_decimal(name, rate)
}

fn to_decimal(name: &str, value: f64) -> Result<Decimal> {
    Decimal::try_from(value)
        .map_err(|e| ForensicsError::InvalidConfig(format!("{} = {}: {}", name, value, e)))
}

fn checked(name: &str, value: Option<Decimal>) -> Result<Decimal> {
    value.ok_or_else(|| ForensicsError::AuditOverflow(name.to_string()))
}

/// Result of auditing one bonding lifecycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadowTaxAudit {
    /// Total SOL traded on the bonding curve
    pub volume: Decimal,
    pub fees_collected: Decimal,
    pub creator_rebate: Decimal,
    /// Fees kept by the protocol after the rebate
    pub protocol_retention: Decimal,
    /// Retention plus the reclaimed virtual advance
    pub total_extraction: Decimal,
    /// SOL extracted per SOL rebated
    pub extraction_ratio: Decimal,
    /// Virtual advance as a share of SOL raised from traders (percent)
    pub compression_tax_pct: Decimal,
    /// Virtual advance as a share of the pre-migration SOL reserve (percent)
    pub density_drop_pct: Decimal,
}

/// Audit a lifecycle with `volume` SOL of bonding-curve trading
pub fn audit_lifecycle(
    params: &ProtocolParams,
    schedule: &FeeSchedule,
    volume: f64,
) -> Result<ShadowTaxAudit> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(ForensicsError::InvalidTradeSize(volume));
    }
    let volume = Decimal::try_from(volume).map_err(|_| ForensicsError::InvalidTradeSize(volume))?;
    let real_sol = to_decimal("real_sol_reserve", params.real_sol_reserve)?;
    let virtual_advance = to_decimal("virtual_advance", params.virtual_advance)?;

    if real_sol <= Decimal::ZERO {
        return Err(ForensicsError::InvalidPoolState {
            sol_reserve: params.real_sol_reserve,
            token_reserve: params.migration_pack,
        });
    }

    let fees_collected = checked("fees_collected", volume.checked_mul(schedule.swap_fee_rate))?;
    let creator_rebate =
        checked("creator_rebate", volume.checked_mul(schedule.creator_rebate_rate))?;
    if creator_rebate.is_zero() {
        return Err(ForensicsError::ZeroRebate);
    }

    let protocol_retention =
        checked("protocol_retention", fees_collected.checked_sub(creator_rebate))?;
    let total_extraction =
        checked("total_extraction", protocol_retention.checked_add(virtual_advance))?;
    // A dust-sized rebate pushes the ratio past Decimal::MAX
    let extraction_ratio =
        checked("extraction_ratio", total_extraction.checked_div(creator_rebate))?;

    let hundred = Decimal::ONE_HUNDRED;
    let compression_tax_pct = checked(
        "compression_tax_pct",
        virtual_advance.checked_div(real_sol).and_then(|r| r.checked_mul(hundred)),
    )?;
    let density_drop_pct = checked(
        "density_drop_pct",
        real_sol
            .checked_add(virtual_advance)
            .and_then(|pre_sol| virtual_advance.checked_div(pre_sol))
            .and_then(|r| r.checked_mul(hundred)),
    )?;

    debug!(
        %volume,
        %fees_collected,
        %creator_rebate,
        %total_extraction,
        %extraction_ratio,
        "shadow tax audit"
    );

    Ok(ShadowTaxAudit {
        volume,
        fees_collected,
        creator_rebate,
        protocol_retention,
        total_extraction,
        extraction_ratio,
        compression_tax_pct,
        density_drop_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_audit_4500_sol_volume() {
        let audit =
            audit_lifecycle(&ProtocolParams::default(), &FeeSchedule::default(), 4500.0).unwrap();

        assert_eq!(audit.fees_collected, dec!(45));
        assert_eq!(audit.creator_rebate, dec!(2.25));
        assert_eq!(audit.protocol_retention, dec!(42.75));
        assert_eq!(audit.total_extraction, dec!(72.75));
        assert_eq!(audit.extraction_ratio.round_dp(2), dec!(32.33));
        assert_eq!(audit.density_drop_pct.round_dp(2), dec!(26.09));
    }

    #[test]
    fn test_audit_5000_sol_volume() {
        let audit =
            audit_lifecycle(&ProtocolParams::default(), &FeeSchedule::default(), 5000.0).unwrap();

        assert_eq!(audit.fees_collected, dec!(50));
        assert_eq!(audit.creator_rebate, dec!(2.5));
        assert_eq!(audit.total_extraction, dec!(77.5));
        assert_eq!(audit.extraction_ratio, dec!(31));
        assert_eq!(audit.compression_tax_pct.round_dp(2), dec!(35.29));
    }

    #[test]
    fn test_zero_volume_has_no_rebate() {
        let result = audit_lifecycle(&ProtocolParams::default(), &FeeSchedule::default(), 0.0);
        assert!(matches!(result, Err(ForensicsError::ZeroRebate)));
    }

    #[test]
    fn test_zero_rebate_rate() {
        let schedule = FeeSchedule::from_rates(0.01, 0.0).unwrap();
        let result = audit_lifecycle(&ProtocolParams::default(), &schedule, 1000.0);
        assert!(matches!(result, Err(ForensicsError::ZeroRebate)));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let result = audit_lifecycle(&ProtocolParams::default(), &FeeSchedule::default(), -5.0);
        assert!(matches!(result, Err(ForensicsError::InvalidTradeSize(_))));
    }

    #[test]
    fn test_dust_volume_overflows_ratio_without_panicking() {
        // rebate of 1e-28 SOL: 30 / 1e-28 exceeds Decimal::MAX
        let result = audit_lifecycle(&ProtocolParams::default(), &FeeSchedule::default(), 2e-25);
        assert!(matches!(result, Err(ForensicsError::AuditOverflow(_))));
    }

    #[test]
    fn test_volume_beyond_decimal_range_rejected() {
        let result = audit_lifecycle(&ProtocolParams::default(), &FeeSchedule::default(), 1e30);
        assert!(matches!(result, Err(ForensicsError::InvalidTradeSize(_))));
    }

    #[test]
    fn test_no_real_sol_rejected() {
        let params = ProtocolParams {
            real_sol_reserve: 0.0,
            ..Default::default()
        };
        let result = audit_lifecycle(&params, &FeeSchedule::default(), 1000.0);
        assert!(matches!(result, Err(ForensicsError::InvalidPoolState { .. })));
    }

    #[test]
    fn test_rates_out_of_range() {
        assert!(FeeSchedule::from_rates(1.5, 0.0005).is_err());
        assert!(FeeSchedule::from_rates(0.01, -0.1).is_err());
        assert!(FeeSchedule::from_rates(f64::NAN, 0.0005).is_err());
    }

    #[test]
    fn test_default_schedule_values() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.swap_fee_rate, dec!(0.01));
        assert_eq!(schedule.creator_rebate_rate, dec!(0.0005));
    }
}
