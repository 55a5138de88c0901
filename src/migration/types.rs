//! Migration Watcher: Type Definitions
//!
//! Purpose:
//!     Log messages as received from the subscription, the validated form the
//!     classifier works on, keyword presets, and the detection record.
//!
//! Created: 2026-10-17

use crate::error::{ForensicsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification payload exactly as the subscription delivered it.
/// Fields are optional so missing data can be reported instead of panicking.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawLogNotification {
    pub signature: Option<String>,
    pub logs: Option<Vec<String>>,
    #[serde(default)]
    pub slot: Option<u64>,
    #[serde(default)]
    pub failed: bool,
}

/// One transaction's program log output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogMessage {
    pub signature: String,
    pub lines: Vec<String>,
    pub slot: Option<u64>,
    /// Transaction errored on-chain (informational, not used for matching)
    pub failed: bool,
}

impl LogMessage {
    pub fn new(signature: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            signature: signature.into(),
            lines,
            slot: None,
            failed: false,
        }
    }
}

impl TryFrom<RawLogNotification> for LogMessage {
    type Error = ForensicsError;

    fn try_from(raw: RawLogNotification) -> Result<Self> {
        let signature = match raw.signature {
            Some(sig) if !sig.trim().is_empty() => sig,
            Some(_) => return Err(ForensicsError::MalformedMessage("blank signature".to_string())),
            None => return Err(ForensicsError::MalformedMessage("missing signature".to_string())),
        };
        let lines = raw.logs.ok_or_else(|| {
            ForensicsError::MalformedMessage(format!("missing logs for {}", signature))
        })?;

        Ok(Self {
            signature,
            lines,
            slot: raw.slot,
            failed: raw.failed,
        })
    }
}

/// Named keyword sets for the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordPreset {
    /// Graduation only: the `migrate` instruction
    #[default]
    Graduation,
    /// Graduation plus AMM pool initialization (`initialize2`)
    Broad,
}

impl KeywordPreset {
    pub fn keywords(&self) -> Vec<String> {
        match self {
            KeywordPreset::Graduation => vec!["migrate".to_string()],
            KeywordPreset::Broad => vec!["migrate".to_string(), "initialize2".to_string()],
        }
    }
}

impl std::str::FromStr for KeywordPreset {
    type Err = ForensicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "graduation" => Ok(Self::Graduation),
            "broad" => Ok(Self::Broad),
            other => Err(ForensicsError::InvalidConfig(format!(
                "unknown keyword preset '{}' (expected graduation or broad)",
                other
            ))),
        }
    }
}

impl fmt::Display for KeywordPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeywordPreset::Graduation => write!(f, "graduation"),
            KeywordPreset::Broad => write!(f, "broad"),
        }
    }
}

/// A message classified as a migration event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionEvent {
    pub signature: String,
    pub matched_keyword: String,
    /// The log line that matched, as received
    pub matched_line: String,
    pub slot: Option<u64>,
    pub timestamp_observed: DateTime<Utc>,
}
