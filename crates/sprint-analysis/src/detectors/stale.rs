use sprint_core::enums::Category;
use sprint_core::finding::Finding;

use super::{DetectionInput, Detector};
use crate::error::DetectorError;

/// Open cards with no activity for longer than `staleness_days`.
pub struct StaleDetector;

impl Detector for StaleDetector {
    fn name(&self) -> &'static str {
        "stale"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError> {
        let config = input.config;

        Ok(input
            .open_cards()?
            .into_iter()
            .filter(|(_, metrics)| metrics.days_since_activity > config.staleness_days)
            .map(|(card, metrics)| {
                let ratio = metrics.days_since_activity / config.staleness_days;
                Finding::new(
                    Category::Stale,
                    config.bands.stale.classify(ratio),
                    input.card_subject(card),
                    format!(
                        "no activity for {:.1} days in '{}'",
                        metrics.days_since_activity, metrics.list_name
                    ),
                )
                .with_metric("days_since_activity", metrics.days_since_activity)
                .with_metric("threshold_ratio", ratio)
            })
            .collect())
    }
}
