use sprint_core::enums::{Category, Severity};
use sprint_core::finding::{Finding, Subject};

use super::{DetectionInput, Detector};
use crate::error::DetectorError;

/// Board-level risk when too few cards have reached a terminal list.
///
/// Below `completion_target_pct` the sprint is at Medium risk, below
/// `completion_critical_pct` at High. An empty board yields nothing.
pub struct CompletionDetector;

impl Detector for CompletionDetector {
    fn name(&self) -> &'static str {
        "completion"
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError> {
        let config = input.config;
        let total = input.metrics.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let completed = input
            .metrics
            .values()
            .filter(|metrics| config.is_terminal_list(&metrics.list_name))
            .count();
        let rate = completed as f64 / total as f64 * 100.0;
        if rate >= config.completion_target_pct {
            return Ok(Vec::new());
        }

        let severity = if rate < config.completion_critical_pct {
            Severity::High
        } else {
            Severity::Medium
        };

        let target = config.completion_target_pct;
        let message = format!(
            "completion rate {rate:.1}% is below the {target:.0}% target \
             ({completed} of {total} done)"
        );

        Ok(vec![
            Finding::new(Category::CompletionRisk, severity, Subject::Board, message)
                .with_metric("completion_rate", rate)
                .with_metric("target_pct", target)
                .with_metric("completed_cards", completed as f64)
                .with_metric("total_cards", total as f64),
        ])
    }
}
