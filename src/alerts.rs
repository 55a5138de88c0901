//! Detection Alerts
//!
//! Posts a Discord webhook embed for every migration detection.
//! Delivery is best effort: failures are logged and the watch carries on.
//!
//! Created: 2026-10-17
//!
//! Usage:
//!   Set `watcher.discord_webhook` in the config or the DISCORD_WEBHOOK
//!   environment variable. Without either, alerts are disabled.

use crate::migration::DetectionEvent;
use crate::types::ProtocolParams;
use serde::Serialize;
use tracing::{error, info, warn};

/// Embed colour for graduation alerts (orange)
const DETECTION_COLOR: u32 = 0xFF8C00;

/// Discord webhook message structure
#[derive(Debug, Serialize)]
struct DiscordMessage {
    content: Option<String>,
    embeds: Vec<DiscordEmbed>,
}

#[derive(Debug, Serialize)]
struct DiscordEmbed {
    title: String,
    description: String,
    url: Option<String>,
    color: u32,
    fields: Vec<DiscordField>,
    footer: Option<DiscordFooter>,
    timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct DiscordField {
    name: String,
    value: String,
    inline: bool,
}

#[derive(Debug, Serialize)]
struct DiscordFooter {
    text: String,
}

/// Discord alerter for detections
pub struct DetectionAlerter {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl DetectionAlerter {
    pub fn new(webhook_url: Option<String>) -> Self {
        let webhook_url = webhook_url.filter(|url| !url.trim().is_empty());

        if webhook_url.is_some() {
            info!("Discord alerts enabled");
        } else {
            warn!("DISCORD_WEBHOOK not set - Discord alerts disabled");
        }

        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Send one detection; no-op when disabled
    pub async fn send_detection(&self, event: &DetectionEvent, params: &ProtocolParams) {
        let webhook_url = match &self.webhook_url {
            Some(url) => url,
            None => return,
        };

        let message = detection_message(event, params);

        match self.client.post(webhook_url).json(&message).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    info!(signature = %event.signature, "Discord alert sent");
                } else {
                    warn!("Discord webhook returned status: {}", response.status());
                }
            }
            Err(e) => {
                error!("Failed to send Discord alert: {}", e);
            }
        }
    }
}

fn detection_message(event: &DetectionEvent, params: &ProtocolParams) -> DiscordMessage {
    let tx_url = params.tx_url(&event.signature);

    let mut fields = vec![
        DiscordField {
            name: "Signature".to_string(),
            value: format!("`{}`", event.signature),
            inline: false,
        },
        DiscordField {
            name: "Keyword".to_string(),
            value: event.matched_keyword.clone(),
            inline: true,
        },
    ];
    if let Some(slot) = event.slot {
        fields.push(DiscordField {
            name: "Slot".to_string(),
            value: slot.to_string(),
            inline: true,
        });
    }
    fields.push(DiscordField {
        name: "Log line".to_string(),
        value: event.matched_line.clone(),
        inline: false,
    });

    let embed = DiscordEmbed {
        title: "Graduation detected".to_string(),
        description: format!(
            "{:.0} SOL virtual advance withdrawn. Pool reprices against {:.0} SOL.",
            params.virtual_advance, params.real_sol_reserve
        ),
        url: Some(tx_url),
        color: DETECTION_COLOR,
        fields,
        footer: Some(DiscordFooter {
            text: format!("Migration program {}", params.migration_program),
        }),
        timestamp: Some(event.timestamp_observed.to_rfc3339()),
    };

    DiscordMessage {
        content: None,
        embeds: vec![embed],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(slot: Option<u64>) -> DetectionEvent {
        DetectionEvent {
            signature: "5sig".to_string(),
            matched_keyword: "migrate".to_string(),
            matched_line: "Program log: Instruction: Migrate".to_string(),
            slot,
            timestamp_observed: Utc::now(),
        }
    }

    #[test]
    fn test_detection_payload() {
        let msg = detection_message(&event(Some(42)), &ProtocolParams::default());
        let json = serde_json::to_value(&msg).unwrap();
        let embed = &json["embeds"][0];

        assert_eq!(embed["url"], "https://solscan.io/tx/5sig");
        assert_eq!(embed["color"], DETECTION_COLOR);
        assert_eq!(embed["fields"].as_array().unwrap().len(), 4);
        assert_eq!(embed["fields"][2]["value"], "42");
        assert!(embed["description"].as_str().unwrap().contains("30 SOL"));
    }

    #[test]
    fn test_slot_field_omitted_when_unknown() {
        let msg = detection_message(&event(None), &ProtocolParams::default());
        assert_eq!(msg.embeds[0].fields.len(), 3);
    }

    #[test]
    fn test_blank_webhook_disables() {
        assert!(!DetectionAlerter::new(Some("  ".to_string())).is_enabled());
        assert!(!DetectionAlerter::new(None).is_enabled());
        assert!(DetectionAlerter::new(Some("https://discord.com/api/webhooks/1/x".to_string()))
            .is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_send_is_noop() {
        DetectionAlerter::new(None)
            .send_detection(&event(None), &ProtocolParams::default())
            .await;
    }
}
