use sprint_core::enums::Category;
use sprint_core::finding::{Finding, Subject};

use crate::document::Recommendation;

/// One recommendation per finding, in the same order.
#[must_use]
pub fn recommend(findings: &[Finding], team_name: &str) -> Vec<Recommendation> {
    findings
        .iter()
        .map(|finding| Recommendation {
            category: finding.category,
            severity: finding.severity,
            subject: finding.subject.key(),
            action: action_for(finding, team_name),
        })
        .collect()
}

fn action_for(finding: &Finding, team_name: &str) -> String {
    let subject = finding.subject.display_name();
    let message = &finding.message;

    match finding.category {
        Category::Blocker => {
            format!("Unblock {subject} — escalate to {}", owners(&finding.subject, team_name))
        }
        Category::Stale => format!(
            "Revisit {subject} with {} and confirm it is still in scope ({message})",
            owners(&finding.subject, team_name)
        ),
        Category::OverdueRisk => format!(
            "Re-plan {subject} with {}: {message}",
            owners(&finding.subject, team_name)
        ),
        Category::WorkloadSkew => match &finding.subject {
            Subject::Member { name, .. } => {
                format!("Move open cards away from {name} ({message})")
            }
            _ => format!("Rebalance open cards across {team_name} ({message})"),
        },
        Category::LowActivity => format!(
            "Ask {} for a status update on {subject} ({message})",
            owners(&finding.subject, team_name)
        ),
        Category::Bottleneck => {
            format!("Clear the queue in {subject} before pulling new work ({message})")
        }
        Category::CompletionRisk => format!(
            "Review sprint scope with {team_name} and defer lower-priority cards ({message})"
        ),
    }
}

/// Assignee names for card subjects, otherwise the team.
fn owners(subject: &Subject, team_name: &str) -> String {
    match subject {
        Subject::Card { assignees, .. } if !assignees.is_empty() => assignees.join(", "),
        _ => team_name.to_string(),
    }
}
