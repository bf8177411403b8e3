use sprint_core::enums::{Category, Severity};
use sprint_core::finding::Finding;

use super::{DetectionInput, Detector};
use crate::error::DetectorError;

/// Open cards past their due date (High) or due within `near_due_days` (Medium).
///
/// Cards without a due date, or whose due date is marked complete, are skipped.
pub struct OverdueDetector;

impl Detector for OverdueDetector {
    fn name(&self) -> &'static str {
        "overdue"
    }

    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError> {
        let near_due = input.config.near_due_days;
        let mut findings = Vec::new();

        for (card, metrics) in input.open_cards()? {
            if card.due_complete {
                continue;
            }
            let Some(days_until_due) = metrics.days_until_due else {
                continue;
            };

            let (severity, message) = if days_until_due < 0.0 {
                (
                    Severity::High,
                    format!("overdue by {:.1} days", -days_until_due),
                )
            } else if days_until_due <= near_due {
                (
                    Severity::Medium,
                    format!("due in {days_until_due:.1} days"),
                )
            } else {
                continue;
            };

            findings.push(
                Finding::new(
                    Category::OverdueRisk,
                    severity,
                    input.card_subject(card),
                    message,
                )
                .with_metric("days_until_due", days_until_due),
            );
        }

        Ok(findings)
    }
}
