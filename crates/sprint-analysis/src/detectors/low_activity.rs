use sprint_core::enums::Category;
use sprint_core::finding::Finding;

use super::{DetectionInput, Detector};
use crate::error::DetectorError;

/// Silent cards: no comments, no events besides creation, sitting past the
/// grace period in a list that is neither the initial nor a terminal one.
pub struct LowActivityDetector;

impl Detector for LowActivityDetector {
    fn name(&self) -> &'static str {
        "low_activity"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError> {
        let config = input.config;

        Ok(input
            .open_cards()?
            .into_iter()
            .filter(|(_, m)| {
                !m.in_initial_list
                    && m.comment_count == 0
                    && m.non_creation_events == 0
                    && m.days_in_list > config.low_activity_grace_days
            })
            .map(|(card, m)| {
                let ratio = m.days_in_list / config.low_activity_grace_days;
                Finding::new(
                    Category::LowActivity,
                    config.bands.low_activity.classify(ratio),
                    input.card_subject(card),
                    format!(
                        "no comments or updates in '{}' for {:.1} days",
                        m.list_name, m.days_in_list
                    ),
                )
                .with_metric("days_in_list", m.days_in_list)
                .with_metric("threshold_ratio", ratio)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use sprint_config::AnalysisConfig;
    use sprint_core::enums::Severity;

    use super::*;
    use crate::detectors::test_support::{board, card, commented, moved};
    use crate::metrics::extract;

    fn run(cards: Vec<sprint_core::board::Card>) -> Vec<Finding> {
        let snapshot = board(cards);
        let metrics = extract(&snapshot, snapshot.captured_at).unwrap();
        let config = AnalysisConfig::default();
        LowActivityDetector
            .detect(&DetectionInput::new(&snapshot, &metrics, &config))
            .unwrap()
    }

    #[test]
    fn silent_card_in_review_is_flagged() {
        let findings = run(vec![card("c1", "review", 5.0)]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn initial_list_is_exempt() {
        assert!(run(vec![card("c1", "todo", 30.0)]).is_empty());
    }

    #[test]
    fn any_comment_or_move_counts_as_activity() {
        let commented_card = commented(card("c1", "review", 5.0), "looking", 4.0);
        let moved_card = moved(card("c2", "review", 5.0), "doing", 4.0);
        assert!(run(vec![commented_card, moved_card]).is_empty());
    }

    #[test]
    fn within_grace_period_is_quiet() {
        assert!(run(vec![card("c1", "review", 1.0)]).is_empty());
    }
}
