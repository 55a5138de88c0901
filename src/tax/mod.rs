//! Shadow Tax Module
//!
//! Fee-flow accounting over a bonding curve's lifecycle: what traders pay,
//! what the creator gets back, and what the protocol keeps once the
//! virtual advance is reclaimed at migration.
//!
//! Created: 2026-10-17

pub mod audit;

pub use audit::{audit_lifecycle, FeeSchedule, ShadowTaxAudit};
