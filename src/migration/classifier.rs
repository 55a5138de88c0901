//! Migration Event Classifier
//!
//! Stateless filter over one log message: the first line containing any
//! configured keyword (case-insensitive) produces a detection. Lines are
//! scanned in order and scanning stops at the first hit, so a message yields
//! at most one event. There is no dedup across messages; repeated signatures
//! are possible under at-least-once delivery.
//!
//! Created: 2026-10-17

use super::types::{DetectionEvent, KeywordPreset, LogMessage};
use crate::error::{ForensicsError, Result};
use chrono::Utc;

#[derive(Debug, Clone, PartialEq)]
pub struct EventClassifier {
    /// Lowercased, trimmed, in configured order
    keywords: Vec<String>,
}

impl EventClassifier {
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            // An empty needle matches every line
            if keyword.is_empty() {
                return Err(ForensicsError::InvalidConfig(
                    "classifier keywords must not be blank".to_string(),
                ));
            }
            if !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        if normalized.is_empty() {
            return Err(ForensicsError::InvalidConfig(
                "classifier needs at least one keyword".to_string(),
            ));
        }
        Ok(Self { keywords: normalized })
    }

    pub fn from_preset(preset: KeywordPreset) -> Self {
        Self {
            keywords: preset.keywords(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Classify one message; `None` means "not a migration".
    pub fn classify(&self, msg: &LogMessage) -> Option<DetectionEvent> {
        msg.lines.iter().find_map(|line| {
            let lowered = line.to_lowercase();
            self.keywords
                .iter()
                .find(|kw| lowered.contains(kw.as_str()))
                .map(|kw| DetectionEvent {
                    signature: msg.signature.clone(),
                    matched_keyword: kw.clone(),
                    matched_line: line.clone(),
                    slot: msg.slot,
                    timestamp_observed: Utc::now(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sig: &str, lines: &[&str]) -> LogMessage {
        LogMessage::new(sig, lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_detects_migrate_instruction() {
        let classifier = EventClassifier::from_preset(KeywordPreset::Graduation);
        let event = classifier
            .classify(&msg("sigA", &["Program log: Instruction: Migrate", "other"]))
            .unwrap();

        assert_eq!(event.signature, "sigA");
        assert_eq!(event.matched_keyword, "migrate");
        assert_eq!(event.matched_line, "Program log: Instruction: Migrate");
    }

    #[test]
    fn test_no_match_is_none() {
        let classifier = EventClassifier::from_preset(KeywordPreset::Graduation);
        assert!(classifier.classify(&msg("sigB", &["nothing relevant"])).is_none());
        assert!(classifier.classify(&msg("sigC", &[])).is_none());
    }

    #[test]
    fn test_case_insensitive_both_ways() {
        let classifier = EventClassifier::new(["MIGRATE"]).unwrap();
        assert_eq!(classifier.keywords(), ["migrate"]);
        assert!(classifier.classify(&msg("s", &["MIGRATE"])).is_some());
        assert!(classifier.classify(&msg("s", &["program MiGrAtE ok"])).is_some());
    }

    #[test]
    fn test_first_matching_line_wins() {
        let classifier = EventClassifier::from_preset(KeywordPreset::Broad);
        let event = classifier
            .classify(&msg(
                "sigD",
                &[
                    "Program invoke [1]",
                    "Program log: Instruction: Initialize2",
                    "Program log: Instruction: Migrate",
                ],
            ))
            .unwrap();
        assert_eq!(event.matched_keyword, "initialize2");
        assert_eq!(event.matched_line, "Program log: Instruction: Initialize2");
    }

    #[test]
    fn test_keyword_order_breaks_ties_on_same_line() {
        let classifier = EventClassifier::new(["initialize2", "migrate"]).unwrap();
        let event = classifier
            .classify(&msg("s", &["migrate then initialize2"]))
            .unwrap();
        assert_eq!(event.matched_keyword, "initialize2");
    }

    #[test]
    fn test_graduation_preset_ignores_pool_init() {
        let classifier = EventClassifier::from_preset(KeywordPreset::Graduation);
        assert!(classifier
            .classify(&msg("s", &["Program log: Instruction: Initialize2"]))
            .is_none());
    }

    #[test]
    fn test_rejects_blank_or_empty_keywords() {
        assert!(EventClassifier::new(Vec::<String>::new()).is_err());
        assert!(EventClassifier::new(["migrate", "  "]).is_err());
    }

    #[test]
    fn test_duplicate_keywords_collapse() {
        let classifier = EventClassifier::new(["migrate", " Migrate "]).unwrap();
        assert_eq!(classifier.keywords().len(), 1);
    }

    #[test]
    fn test_slot_carried_over() {
        let classifier = EventClassifier::from_preset(KeywordPreset::Graduation);
        let mut message = msg("s", &["migrate"]);
        message.slot = Some(321);
        assert_eq!(classifier.classify(&message).unwrap().slot, Some(321));
    }
}
