//! Configuration management
//!
//! Layering: built-in defaults, then the TOML file, then `.env` / process
//! environment, then CLI flags (applied by the binary). `validate()` runs
//! on the merged result.
//!
//! Created: 2026-10-17

use crate::error::{ForensicsError, Result};
use crate::migration::{EventClassifier, KeywordPreset};
use crate::tax::FeeSchedule;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

// Re-export for callers that only need the protocol side
pub use crate::types::ProtocolParams;

/// Config file picked up when no `--config` is given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/forensics.toml";

/// Public mainnet RPC; rate limited, fine for a single logsSubscribe
pub const DEFAULT_WS_URL: &str = "wss://api.mainnet-beta.solana.com";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub protocol: ProtocolParams,
    pub watcher: WatcherConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub ws_url: String,
    pub commitment: String,
    pub preset: KeywordPreset,
    /// Custom keyword list; replaces the preset when non-empty
    pub keywords: Vec<String>,
    /// Reconnects after a subscription failure before giving up (0 = none)
    pub max_reconnects: u32,
    pub reconnect_delay_secs: u64,
    pub discord_webhook: Option<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            commitment: "confirmed".to_string(),
            preset: KeywordPreset::default(),
            keywords: Vec::new(),
            max_reconnects: 0,
            reconnect_delay_secs: 5,
            discord_webhook: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub swap_fee_rate: f64,
    pub creator_rebate_rate: f64,
    /// Bonding volume used when `audit` is run without --volume
    pub default_volume: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            swap_fee_rate: 0.01,
            creator_rebate_rate: 0.0005,
            default_volume: 4500.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content).with_context(|| "Failed to parse TOML configuration")
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Explicit path must exist; otherwise fall back to the default path, then to defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Apply `.env` and process environment overrides
    pub fn apply_env(&mut self) {
        dotenv::dotenv().ok();
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override from a key lookup: SOLANA_WS_URL, DISCORD_WEBHOOK, MIGRATION_PROGRAM
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SOLANA_WS_URL").filter(|v| !v.is_empty()) {
            self.watcher.ws_url = url;
        }
        if let Some(hook) = lookup("DISCORD_WEBHOOK").filter(|v| !v.is_empty()) {
            self.watcher.discord_webhook = Some(hook);
        }
        if let Some(program) = lookup("MIGRATION_PROGRAM").filter(|v| !v.is_empty()) {
            self.protocol.migration_program = program;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.protocol.validate()?;
        if !(self.watcher.ws_url.starts_with("ws://") || self.watcher.ws_url.starts_with("wss://")) {
            return Err(ForensicsError::InvalidConfig(format!(
                "watcher.ws_url must be a ws:// or wss:// URL, got '{}'",
                self.watcher.ws_url
            )));
        }
        match self.watcher.commitment.as_str() {
            "processed" | "confirmed" | "finalized" => {}
            other => {
                return Err(ForensicsError::InvalidConfig(format!(
                    "watcher.commitment must be processed, confirmed or finalized, got '{}'",
                    other
                )))
            }
        }
        self.classifier()?;
        self.fee_schedule()?;
        Ok(())
    }

    /// Classifier for the configured preset or custom keyword list
    pub fn classifier(&self) -> Result<EventClassifier> {
        if self.watcher.keywords.is_empty() {
            Ok(EventClassifier::from_preset(self.watcher.preset))
        } else {
            EventClassifier::new(&self.watcher.keywords)
        }
    }

    pub fn fee_schedule(&self) -> Result<FeeSchedule> {
        FeeSchedule::from_rates(self.audit.swap_fee_rate, self.audit.creator_rebate_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[general]
log_level = "debug"

[protocol]
real_sol_reserve = 80.0
virtual_advance = 25.0

[watcher]
ws_url = "wss://rpc.example.com"
preset = "broad"
max_reconnects = 3

[audit]
default_volume = 5000.0
"#;

        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.protocol.real_sol_reserve, 80.0);
        // Unset fields keep their defaults
        assert_eq!(config.protocol.migration_pack, 206_900_000.0);
        assert_eq!(config.watcher.preset, KeywordPreset::Broad);
        assert_eq!(config.watcher.commitment, "confirmed");
        assert_eq!(config.watcher.max_reconnects, 3);
        assert_eq!(config.audit.default_volume, 5000.0);
        assert_eq!(config.audit.swap_fee_rate, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.protocol, ProtocolParams::default());
        assert_eq!(config.watcher.ws_url, DEFAULT_WS_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let result = AppConfig::from_toml_str("[watcher]\npreset = \"everything\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_keywords_replace_preset() {
        let config = AppConfig::from_toml_str(
            "[watcher]\npreset = \"graduation\"\nkeywords = [\"Withdraw\", \"migrate\"]\n",
        )
        .unwrap();
        let classifier = config.classifier().unwrap();
        assert_eq!(classifier.keywords(), ["withdraw", "migrate"]);
    }

    #[test]
    fn test_blank_keyword_fails_validation() {
        let config = AppConfig::from_toml_str("[watcher]\nkeywords = [\"\"]\n").unwrap();
        assert!(matches!(config.validate(), Err(ForensicsError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_url_and_commitment() {
        let mut config = AppConfig::default();
        config.watcher.ws_url = "https://api.mainnet-beta.solana.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.watcher.commitment = "eventually".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SOLANA_WS_URL", "wss://helius.example/ws"),
            ("DISCORD_WEBHOOK", "https://discord.com/api/webhooks/1/x"),
            ("MIGRATION_PROGRAM", ""),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.watcher.ws_url, "wss://helius.example/ws");
        assert!(config.watcher.discord_webhook.is_some());
        // Empty values do not override
        assert_eq!(config.protocol.migration_program, crate::types::DEFAULT_MIGRATION_PROGRAM);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = AppConfig::load_or_default(Some(Path::new("/nonexistent/forensics.toml")));
        assert!(result.is_err());
    }
}
