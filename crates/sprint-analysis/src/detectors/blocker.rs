//! Blocked cards.
//!
//! A card is blocked when any of these hold:
//! - it carries a blocking label, or a label in a blocking color
//! - it sits in a blocked list
//! - it is unassigned and has been in its list longer than `blocker_age_days`
//! - a comment mentions a blocker keyword
//!
//! One finding is emitted per reason; the analyzer's deduplication folds
//! them into a single finding per card.

use sprint_core::enums::{Category, Severity};
use sprint_core::finding::Finding;

use super::{DetectionInput, Detector};
use crate::error::DetectorError;

pub struct BlockerDetector;

impl Detector for BlockerDetector {
    fn name(&self) -> &'static str {
        "blocker"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError> {
        let config = input.config;
        let mut findings = Vec::new();

        for (card, metrics) in input.open_cards()? {
            let mut reasons = Vec::new();

            if let Some(label) = card.labels.iter().find(|l| config.is_blocking_label(l)) {
                reasons.push(format!("labeled '{label}'"));
            }
            if let Some(color) = card
                .label_colors
                .iter()
                .find(|c| config.is_blocking_label_color(c))
            {
                reasons.push(format!("has a {color} label"));
            }
            if config.is_blocked_list(&metrics.list_name) {
                reasons.push(format!("sits in blocked list '{}'", metrics.list_name));
            }
            if card.assignees.is_empty() && metrics.days_in_list > config.blocker_age_days {
                reasons.push(format!(
                    "unassigned for {:.1} days in '{}'",
                    metrics.days_in_list, metrics.list_name
                ));
            }
            if let Some(keyword) = card
                .comments
                .iter()
                .find_map(|comment| config.blocker_keyword_in(&comment.text))
            {
                reasons.push(format!("comment mentions '{keyword}'"));
            }

            if reasons.is_empty() {
                continue;
            }

            let ratio = metrics.days_in_list / config.blocker_age_days;
            let severity = config.bands.blocker.classify(ratio).max(Severity::Medium);

            for reason in reasons {
                findings.push(
                    Finding::new(
                        Category::Blocker,
                        severity,
                        input.card_subject(card),
                        reason,
                    )
                    .with_metric("days_in_list", metrics.days_in_list)
                    .with_metric("threshold_ratio", ratio),
                );
            }
        }

        Ok(findings)
    }
}
