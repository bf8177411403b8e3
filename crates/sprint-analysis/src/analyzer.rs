//! The analysis pipeline: extract metrics, run detectors, deduplicate, and
//! assemble an [`AnalysisResult`].

use std::collections::{BTreeMap, BTreeSet};
use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use sprint_config::AnalysisConfig;
use sprint_core::analysis::{
    AnalysisResult, DetectorFailure, ListCount, SummaryCounts, WorkloadRow, WorkloadTable,
};
use sprint_core::board::BoardSnapshot;
use sprint_core::enums::Category;
use sprint_core::errors::CoreError;
use sprint_core::finding::{Finding, Subject};

use crate::detectors::{DetectionInput, Detector};
use crate::error::DetectorError;
use crate::metrics::{MetricsMap, extract};

/// Analyze `snapshot` as of `reference_time`.
///
/// Detectors run in parallel. A detector that errors or panics is recorded
/// in [`AnalysisResult::detector_failures`] and the rest of the run goes on.
///
/// # Errors
///
/// Returns [`CoreError::MalformedSnapshot`] when metric extraction fails.
pub fn analyze(
    snapshot: &BoardSnapshot,
    detectors: &[Box<dyn Detector>],
    config: &AnalysisConfig,
    reference_time: DateTime<Utc>,
) -> Result<AnalysisResult, CoreError> {
    tracing::info!(
        board = %snapshot.board_id,
        cards = snapshot.cards.len(),
        detectors = detectors.len(),
        "analyzing board snapshot"
    );

    let metrics = extract(snapshot, reference_time)?;
    let input = DetectionInput::new(snapshot, &metrics, config);

    let outcomes: Vec<(&'static str, Result<Vec<Finding>, DetectorError>)> = detectors
        .par_iter()
        .map(|detector| (detector.name(), run_isolated(detector.as_ref(), &input)))
        .collect();

    let mut findings = Vec::new();
    let mut failures = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(found) => {
                tracing::debug!(detector = name, findings = found.len(), "detector finished");
                findings.extend(found);
            }
            Err(error) => {
                tracing::warn!(detector = name, %error, "detector failed, skipping its findings");
                failures.push(DetectorFailure {
                    detector: name.to_string(),
                    error: error.to_string(),
                });
            }
        }
    }

    let findings = deduplicate(retain_known_subjects(snapshot, findings));
    let workload = workload_table(snapshot, &metrics, config);
    let mut summary = summary_counts(snapshot, &metrics, config);
    summary.tally(&findings);

    tracing::info!(
        findings = findings.len(),
        failures = failures.len(),
        "analysis complete"
    );

    Ok(AnalysisResult::new(
        snapshot.board_id.clone(),
        snapshot.board_name.clone(),
        reference_time,
        findings,
        workload,
        summary,
        failures,
    ))
}

fn run_isolated(
    detector: &dyn Detector,
    input: &DetectionInput<'_>,
) -> Result<Vec<Finding>, DetectorError> {
    catch_unwind(AssertUnwindSafe(|| detector.detect(input))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(DetectorError::Panicked(message))
    })
}

/// Drop findings whose subject is not in the snapshot.
fn retain_known_subjects(snapshot: &BoardSnapshot, findings: Vec<Finding>) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|finding| {
            let known = subject_exists(snapshot, &finding.subject);
            if !known {
                tracing::warn!(
                    subject = %finding.subject.key(),
                    category = %finding.category,
                    "dropping finding for unknown subject"
                );
            }
            known
        })
        .collect()
}

/// Collapse findings sharing a category and subject.
///
/// The merged finding keeps the highest severity, every distinct message
/// (sorted, joined with `"; "`), and the union of metrics, where values from
/// the most severe finding win. Output is in canonical order.
#[must_use]
pub fn deduplicate(findings: Vec<Finding>) -> Vec<Finding> {
    let mut groups: BTreeMap<(Category, String), Vec<Finding>> = BTreeMap::new();
    for finding in findings {
        groups
            .entry((finding.category, finding.subject.key()))
            .or_default()
            .push(finding);
    }

    let mut merged: Vec<Finding> = groups.into_values().filter_map(merge_group).collect();
    merged.sort_by(Finding::canonical_cmp);
    merged
}

fn merge_group(mut group: Vec<Finding>) -> Option<Finding> {
    group.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.message.cmp(&b.message))
    });
    let messages: BTreeSet<String> = group.iter().map(|f| f.message.clone()).collect();

    let mut rest = group.into_iter();
    let mut merged = rest.next()?;
    for finding in rest {
        for (name, value) in finding.metrics {
            merged.metrics.entry(name).or_insert(value);
        }
    }
    merged.message = messages.into_iter().collect::<Vec<_>>().join("; ");
    Some(merged)
}

fn workload_table(
    snapshot: &BoardSnapshot,
    metrics: &MetricsMap,
    config: &AnalysisConfig,
) -> WorkloadTable {
    let mut rows: BTreeMap<&str, WorkloadRow> = BTreeMap::new();
    let mut order: Vec<&str> = snapshot.members.iter().map(|m| m.id.as_str()).collect();
    let mut unassigned_open_cards = 0;

    for member in &snapshot.members {
        rows.insert(member.id.as_str(), empty_row(&member.id, &member.display_name));
    }

    for card in &snapshot.cards {
        let Some(m) = metrics.get(&card.id) else {
            continue;
        };
        let done = config.is_terminal_list(&m.list_name);
        let overdue = !done && !card.due_complete && m.days_until_due.is_some_and(|d| d < 0.0);

        if card.assignees.is_empty() && !done {
            unassigned_open_cards += 1;
        }

        for member in &card.assignees {
            let row = rows.entry(member.as_str()).or_insert_with(|| {
                order.push(member.as_str());
                empty_row(member, snapshot.member_name(member))
            });
            row.total_cards += 1;
            if done {
                row.completed_cards += 1;
            } else {
                row.open_cards += 1;
                if let Some(estimate) = card.estimate {
                    *row.estimated_effort.get_or_insert(0.0) += estimate;
                }
            }
            if overdue {
                row.overdue_cards += 1;
            }
        }
    }

    WorkloadTable {
        rows: order
            .into_iter()
            .filter_map(|id| rows.remove(id))
            .collect(),
        unassigned_open_cards,
    }
}

fn empty_row(id: &str, name: &str) -> WorkloadRow {
    WorkloadRow {
        member_id: id.to_string(),
        name: name.to_string(),
        open_cards: 0,
        total_cards: 0,
        completed_cards: 0,
        overdue_cards: 0,
        estimated_effort: None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn summary_counts(
    snapshot: &BoardSnapshot,
    metrics: &MetricsMap,
    config: &AnalysisConfig,
) -> SummaryCounts {
    let cards_per_list = snapshot
        .ordered_lists()
        .into_iter()
        .map(|list| ListCount {
            list_id: list.id.clone(),
            name: list.name.clone(),
            cards: metrics.values().filter(|m| m.list_id == list.id).count(),
        })
        .collect();

    let total_cards = metrics.len();
    let completed_cards = metrics
        .values()
        .filter(|m| config.is_terminal_list(&m.list_name))
        .count();
    let completion_rate = if total_cards == 0 {
        0.0
    } else {
        completed_cards as f64 / total_cards as f64 * 100.0
    };

    SummaryCounts {
        cards_per_list,
        total_cards,
        open_cards: total_cards - completed_cards,
        completed_cards,
        completion_rate,
        ..SummaryCounts::default()
    }
}

/// Whether `subject` refers to something present in `snapshot`.
fn subject_exists(snapshot: &BoardSnapshot, subject: &Subject) -> bool {
    match subject {
        Subject::Card { id, .. } => snapshot.card(id).is_some(),
        Subject::Member { id, .. } => {
            snapshot.member(id).is_some() || snapshot.cards.iter().any(|c| c.assignees.contains(id))
        }
        Subject::List { id, .. } => snapshot.list(id).is_some(),
        Subject::Board => true,
    }
}
