//! Migration Forensics Library
//!
//! Quantifies what a bonding-curve graduation does to a token's liquidity
//! (constant-product slippage before vs. after the virtual SOL advance is
//! withdrawn) and watches the migration program's logs for the graduation
//! transaction itself.
//!
//! Created: 2026-10-17

pub mod alerts;
pub mod config;
pub mod error;
pub mod migration;
pub mod pool;
pub mod report;
pub mod tax;
pub mod types;

// Re-export commonly used types
pub use alerts::DetectionAlerter;
pub use config::AppConfig;
pub use error::{ForensicsError, Result};
pub use migration::{
    DetectionEvent, EventClassifier, KeywordPreset, LogMessage, LogSubscription,
    MigrationWatcher, WsLogSubscription,
};
pub use pool::{impact_matrix, summarize, ImpactSummary, PoolState, PriceCalculator, TradeQuote};
pub use tax::{audit_lifecycle, FeeSchedule, ShadowTaxAudit};
pub use types::ProtocolParams;
