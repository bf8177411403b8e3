//! Maps an [`AnalysisResult`] and a section template onto a [`Document`].

use sprint_config::{ReportConfig, SectionKind, SectionSpec};
use sprint_core::analysis::AnalysisResult;
use sprint_core::enums::Category;
use sprint_core::finding::Finding;

use crate::document::{Block, Document, Narrative, Section, Table};
use crate::narrative::{NarrativeRenderer, StyleHints};
use crate::recommendations::recommend;

const NOT_CONFIGURED: &str = "no narrative renderer configured";
const NO_FINDINGS: &str = "No issues detected for this sprint.";

/// Build the report for `result`, section by section in template order.
///
/// The renderer is only consulted for narrative sections. When it is absent
/// or fails, the section carries a structured fallback instead of prose, so
/// a document is always produced.
pub async fn assemble(
    result: &AnalysisResult,
    report: &ReportConfig,
    renderer: Option<&dyn NarrativeRenderer>,
) -> Document {
    let mut sections = Vec::with_capacity(report.sections.sections.len());

    for spec in &report.sections.sections {
        let body = match spec.kind {
            SectionKind::Summary => summary_blocks(result),
            SectionKind::Blockers => vec![Block::Findings(sorted_in(result, &[Category::Blocker]))],
            SectionKind::Deadlines => vec![Block::Findings(sorted_in(
                result,
                &[Category::OverdueRisk, Category::CompletionRisk],
            ))],
            SectionKind::TeamPerformance => team_blocks(result),
            SectionKind::Recommendations => vec![Block::Recommendations(recommend(
                result.findings(),
                &report.team_name,
            ))],
            SectionKind::Narrative => {
                vec![Block::Narrative(
                    narrative(result, report, spec, renderer).await,
                )]
            }
        };
        sections.push(Section {
            name: spec.title.clone(),
            kind: spec.kind,
            body,
        });
    }

    tracing::info!(sections = sections.len(), "assembled report");

    Document {
        title: format!("Sprint Health Report: {}", report.sprint_name),
        subtitle: format!(
            "{} · {} · {}",
            report.team_name,
            result.board_name(),
            result.reference_time().format("%Y-%m-%d")
        ),
        generated_at: result.reference_time(),
        sections,
    }
}

/// Findings in `categories`, most severe first.
fn sorted_in(result: &AnalysisResult, categories: &[Category]) -> Vec<Finding> {
    let mut findings: Vec<Finding> = result
        .findings()
        .iter()
        .filter(|finding| categories.contains(&finding.category))
        .cloned()
        .collect();
    findings.sort_by(Finding::report_cmp);
    findings
}

fn summary_blocks(result: &AnalysisResult) -> Vec<Block> {
    let summary = result.summary();

    let mut lists = Table::new(&["List", "Cards", "Share"]);
    for list in &summary.cards_per_list {
        lists.push_row(vec![
            list.name.clone(),
            list.cards.to_string(),
            percent(list.cards, summary.total_cards),
        ]);
    }

    let mut categories = Table::new(&["Category", "Findings"]);
    for category in Category::ALL {
        let count = summary.by_category.get(&category).copied().unwrap_or(0);
        categories.push_row(vec![category.label().to_string(), count.to_string()]);
    }

    let severities = summary
        .by_severity
        .iter()
        .rev()
        .map(|(severity, count)| format!("{count} {severity}"))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        Block::Note(format!(
            "{} cards, {} completed ({:.1}% completion). Findings by severity: {}.",
            summary.total_cards, summary.completed_cards, summary.completion_rate, severities
        )),
        Block::Table(lists),
        Block::Table(categories),
    ]
}

fn team_blocks(result: &AnalysisResult) -> Vec<Block> {
    let workload = result.workload();

    let mut table = Table::new(&[
        "Member",
        "Open",
        "Total",
        "Completed",
        "Completion Rate",
        "Overdue",
        "Estimated Effort",
    ]);
    for row in &workload.rows {
        table.push_row(vec![
            row.name.clone(),
            row.open_cards.to_string(),
            row.total_cards.to_string(),
            row.completed_cards.to_string(),
            format!("{:.1}%", row.completion_rate()),
            row.overdue_cards.to_string(),
            row.estimated_effort
                .map_or_else(|| "-".to_string(), |effort| format!("{effort:.1}")),
        ]);
    }

    let mut blocks = vec![Block::Table(table)];
    if workload.unassigned_open_cards > 0 {
        blocks.push(Block::Note(format!(
            "{} open cards have no assignee.",
            workload.unassigned_open_cards
        )));
    }
    blocks.push(Block::Findings(sorted_in(result, &[Category::WorkloadSkew])));
    blocks
}

async fn narrative(
    result: &AnalysisResult,
    report: &ReportConfig,
    spec: &SectionSpec,
    renderer: Option<&dyn NarrativeRenderer>,
) -> Narrative {
    let categories: Vec<Category> = Category::ALL
        .into_iter()
        .filter(|category| spec.includes(*category))
        .collect();
    let findings = sorted_in(result, &categories);

    if findings.is_empty() {
        return Narrative::Prose {
            text: NO_FINDINGS.to_string(),
        };
    }

    let Some(renderer) = renderer else {
        return Narrative::Fallback {
            reason: NOT_CONFIGURED.to_string(),
            findings,
        };
    };

    let hints = StyleHints {
        sprint_name: report.sprint_name.clone(),
        team_name: report.team_name.clone(),
        board_name: result.board_name().to_string(),
        section_title: spec.title.clone(),
    };

    match renderer.summarize(&findings, &hints).await {
        Ok(text) if !text.trim().is_empty() => Narrative::Prose {
            text: text.trim().to_string(),
        },
        Ok(_) => Narrative::Fallback {
            reason: crate::narrative::RenderError::EmptyResponse.to_string(),
            findings,
        },
        Err(error) => {
            tracing::warn!(
                section = %spec.title,
                %error,
                "narrative unavailable, using structured fallback"
            );
            Narrative::Fallback {
                reason: error.to_string(),
                findings,
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_empty_boards() {
        assert_eq!(percent(0, 0), "0.0%");
        assert_eq!(percent(1, 3), "33.3%");
    }
}
