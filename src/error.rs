//! Error Types
//!
//! One error enum for the whole library. Computational errors abort the
//! single quote/report that raised them; `MalformedMessage` is recovered
//! inside the watcher; `SubscriptionFailure` ends the watch session and is
//! handed to the caller, who owns the reconnect decision.
//!
//! Created: 2026-10-17

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForensicsError {
    /// SOL or token reserve is not strictly positive (or not finite)
    #[error("invalid pool state: sol_reserve={sol_reserve}, token_reserve={token_reserve}")]
    InvalidPoolState { sol_reserve: f64, token_reserve: f64 },

    /// Trade size must be a finite, strictly positive SOL amount
    #[error("invalid trade size: {0} SOL (must be > 0)")]
    InvalidTradeSize(f64),

    /// Pre-migration impact is zero, escalation ratio is undefined
    #[error("pre-migration impact is zero for {sol_in} SOL; escalation ratio undefined")]
    DivideByZeroImpact { sol_in: f64 },

    /// Creator rebate is zero, extraction ratio is undefined
    #[error("creator rebate is zero; extraction ratio undefined")]
    ZeroRebate,

    /// A fee-audit figure does not fit in a Decimal
    #[error("audit arithmetic overflow computing {0}")]
    AuditOverflow(String),

    /// Notification missing its signature or log lines
    #[error("malformed log message: {0}")]
    MalformedMessage(String),

    /// Connection drop or protocol error from the log subscription
    #[error("subscription failure: {0}")]
    SubscriptionFailure(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ForensicsError {
    /// True for errors that end a watch session (as opposed to per-message errors)
    pub fn is_fatal_to_watch(&self) -> bool {
        matches!(self, ForensicsError::SubscriptionFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, ForensicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_subscription_failure_is_fatal() {
        assert!(ForensicsError::SubscriptionFailure("closed".into()).is_fatal_to_watch());
        assert!(!ForensicsError::MalformedMessage("no signature".into()).is_fatal_to_watch());
        assert!(!ForensicsError::ZeroRebate.is_fatal_to_watch());
    }

    #[test]
    fn test_display_mentions_values() {
        let err = ForensicsError::InvalidPoolState { sol_reserve: 0.0, token_reserve: 5.0 };
        let text = err.to_string();
        assert!(text.contains("sol_reserve=0"));
        assert!(text.contains("token_reserve=5"));
    }

    #[test]
    fn test_audit_overflow_names_the_figure() {
        let err = ForensicsError::AuditOverflow("extraction_ratio".into());
        assert!(err.to_string().contains("extraction_ratio"));
        assert!(!err.is_fatal_to_watch());
    }
}
