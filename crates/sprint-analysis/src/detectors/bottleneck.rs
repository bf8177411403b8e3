use std::collections::BTreeMap;

use sprint_core::enums::{Category, Severity};
use sprint_core::finding::{Finding, Subject};

use super::{DetectionInput, Detector};
use crate::error::DetectorError;

/// Work-in-progress lists holding far more cards than the others.
///
/// The mean is taken over open, non-terminal lists. A list is flagged when it
/// has at least `bottleneck_min_cards` cards and more than `bottleneck_factor`
/// times the mean.
pub struct BottleneckDetector;

impl Detector for BottleneckDetector {
    fn name(&self) -> &'static str {
        "bottleneck"
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError> {
        let config = input.config;
        let wip_lists: Vec<_> = input
            .snapshot
            .ordered_lists()
            .into_iter()
            .filter(|list| !list.closed && !config.is_terminal_list(&list.name))
            .collect();
        if wip_lists.is_empty() {
            return Ok(Vec::new());
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for metrics in input.metrics.values() {
            *counts.entry(metrics.list_id.as_str()).or_insert(0) += 1;
        }

        let total: usize = wip_lists
            .iter()
            .map(|list| counts.get(list.id.as_str()).copied().unwrap_or(0))
            .sum();
        let mean = total as f64 / wip_lists.len() as f64;
        if mean <= 0.0 {
            return Ok(Vec::new());
        }

        let mut findings = Vec::new();
        for list in wip_lists {
            let cards = counts.get(list.id.as_str()).copied().unwrap_or(0);
            let ratio = cards as f64 / mean;
            if cards < config.bottleneck_min_cards || ratio <= config.bottleneck_factor {
                continue;
            }
            let severity = config.bands.bottleneck.classify(ratio).max(Severity::Medium);
            findings.push(
                Finding::new(
                    Category::Bottleneck,
                    severity,
                    Subject::List {
                        id: list.id.clone(),
                        name: list.name.clone(),
                    },
                    format!("holds {cards} cards, {ratio:.1}x the average of {mean:.1} per list"),
                )
                .with_metric("cards", cards as f64)
                .with_metric("list_mean", mean)
                .with_metric("ratio", ratio),
            );
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sprint_config::{AnalysisConfig, SeverityBands};

    use super::*;
    use crate::detectors::test_support::{board, card};
    use crate::metrics::extract;

    fn cards_in(list: &str, count: usize) -> Vec<sprint_core::board::Card> {
        (0..count)
            .map(|i| card(&format!("{list}-{i}"), list, 1.0))
            .collect()
    }

    fn run(cards: Vec<sprint_core::board::Card>) -> Vec<Finding> {
        run_with(cards, &AnalysisConfig::default())
    }

    fn run_with(cards: Vec<sprint_core::board::Card>, config: &AnalysisConfig) -> Vec<Finding> {
        let snapshot = board(cards);
        let metrics = extract(&snapshot, snapshot.captured_at).unwrap();
        BottleneckDetector
            .detect(&DetectionInput::new(&snapshot, &metrics, config))
            .unwrap()
    }

    // Four WIP lists, so the mean is total / 4.
    #[rstest]
    #[case::exactly_twice_the_mean(2, 2, 4, Severity::Medium)]
    #[case::just_past_the_high_band(1, 2, 5, Severity::High)]
    #[case::three_times_the_mean(1, 1, 6, Severity::High)]
    fn review_severity_follows_bands(
        #[case] todo: usize,
        #[case] doing: usize,
        #[case] review: usize,
        #[case] expected: Severity,
    ) {
        let mut cards = cards_in("todo", todo);
        cards.extend(cards_in("doing", doing));
        cards.extend(cards_in("review", review));

        let findings = run(cards);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject.key(), "list:review");
        assert_eq!(findings[0].severity, expected);
    }

    #[test]
    fn configured_bands_override_defaults() {
        let mut config = AnalysisConfig::default();
        config.bands.bottleneck = SeverityBands::new(3.0, 4.0);
        let mut cards = cards_in("todo", 1);
        cards.extend(cards_in("doing", 1));
        cards.extend(cards_in("review", 6));

        let findings = run_with(cards, &config);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn overloaded_review_list_is_high() {
        // Four WIP lists: 1 + 1 + 6 + 0 = 8 cards, mean 2, review at 3x.
        let mut cards = cards_in("todo", 1);
        cards.extend(cards_in("doing", 1));
        cards.extend(cards_in("review", 6));

        let findings = run(cards);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject.key(), "list:review");
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn small_lists_are_never_bottlenecks() {
        let findings = run(cards_in("review", 2));
        assert!(findings.is_empty());
    }

    #[test]
    fn done_list_is_not_a_bottleneck() {
        let mut cards = cards_in("done", 20);
        cards.extend(cards_in("doing", 1));
        assert!(run(cards).is_empty());
    }
}
