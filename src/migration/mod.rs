//! Migration Watcher Module
//!
//! Purpose:
//!     Detect the on-chain transaction that graduates a bonding curve
//!     (withdraws the virtual SOL advance) from a live log subscription.
//!
//! Created: 2026-10-17
//!
//! Architecture:
//!     types.rs        - RawLogNotification, LogMessage, KeywordPreset, DetectionEvent
//!     classifier.rs   - stateless keyword filter over one message
//!     subscription.rs - LogSubscription seam + Solana logsSubscribe over WebSocket
//!     monitor.rs      - MigrationWatcher: subscription stream -> detection stream

pub mod classifier;
pub mod monitor;
pub mod subscription;
pub mod types;

pub use classifier::EventClassifier;
pub use monitor::{MigrationWatcher, WatchStats};
pub use subscription::{LogStream, LogSubscription, WsLogSubscription};
pub use types::{DetectionEvent, KeywordPreset, LogMessage, RawLogNotification};
