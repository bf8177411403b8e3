//! Markdown serialization of a [`Document`].

use std::fmt::Write;

use sprint_core::finding::Finding;

use crate::document::{Block, Document, Narrative, Recommendation, Table};

/// Action listed when the analysis produced no findings.
const NOTHING_TO_FIX: &str = "Continue monitoring sprint progress.";

/// Render `document` as GitHub-flavored markdown.
#[must_use]
pub fn to_markdown(document: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", document.title);
    let _ = writeln!(out, "_{}_\n", document.subtitle);

    for section in &document.sections {
        let _ = writeln!(out, "## {}\n", section.name);
        for block in &section.body {
            write_block(&mut out, block);
        }
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Note(text) => {
            let _ = writeln!(out, "{text}\n");
        }
        Block::Table(table) => write_table(out, table),
        Block::Findings(findings) => write_findings(out, findings),
        Block::Recommendations(recommendations) => write_recommendations(out, recommendations),
        Block::Narrative(Narrative::Prose { text }) => {
            let _ = writeln!(out, "{text}\n");
        }
        Block::Narrative(Narrative::Fallback { reason, findings }) => {
            let _ = writeln!(out, "> Narrative unavailable ({reason}). Structured summary:\n");
            write_findings(out, findings);
        }
    }
}

fn write_table(out: &mut String, table: &Table) {
    let _ = writeln!(out, "| {} |", table.headers.join(" | "));
    let _ = writeln!(
        out,
        "|{}",
        table.headers.iter().map(|_| "---|").collect::<String>()
    );
    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(|cell| escape_cell(cell)).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out.push('\n');
}

fn write_findings(out: &mut String, findings: &[Finding]) {
    if findings.is_empty() {
        out.push_str("_None._\n\n");
        return;
    }
    for finding in findings {
        let _ = writeln!(
            out,
            "- **{}** {}: {}",
            finding.severity.as_str().to_uppercase(),
            finding.subject.display_name(),
            finding.message
        );
    }
    out.push('\n');
}

fn write_recommendations(out: &mut String, recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        let _ = writeln!(out, "1. {NOTHING_TO_FIX}\n");
        return;
    }
    for (index, recommendation) in recommendations.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, recommendation.action);
    }
    out.push('\n');
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use sprint_config::SectionKind;
    use sprint_core::enums::{Category, Severity};
    use sprint_core::finding::Subject;

    use super::*;
    use crate::document::Section;

    #[test]
    fn renders_sections_in_order() {
        let mut table = Table::new(&["List", "Cards"]);
        table.push_row(vec!["To Do | Next".into(), "2".into()]);

        let document = Document {
            title: "Sprint Health Report: S1".into(),
            subtitle: "Team · Board · 2026-03-20".into(),
            generated_at: Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap(),
            sections: vec![
                Section {
                    name: "Summary".into(),
                    kind: SectionKind::Summary,
                    body: vec![Block::Table(table)],
                },
                Section {
                    name: "Narrative".into(),
                    kind: SectionKind::Narrative,
                    body: vec![Block::Narrative(Narrative::Fallback {
                        reason: "offline".into(),
                        findings: vec![Finding::new(
                            Category::Stale,
                            Severity::High,
                            Subject::Board,
                            "quiet",
                        )],
                    })],
                },
            ],
        };

        let expected = "\
# Sprint Health Report: S1

_Team · Board · 2026-03-20_

## Summary

| List | Cards |
|---|---|
| To Do \\| Next | 2 |

## Narrative

> Narrative unavailable (offline). Structured summary:

- **HIGH** the board: quiet
";
        assert_eq!(to_markdown(&document), expected);
    }

    #[test]
    fn empty_recommendations_default_to_monitoring() {
        let document = Document {
            title: "Sprint Health Report: S1".into(),
            subtitle: "Team · Board · 2026-03-20".into(),
            generated_at: Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap(),
            sections: vec![Section {
                name: "Recommendations".into(),
                kind: SectionKind::Recommendations,
                body: vec![Block::Recommendations(Vec::new())],
            }],
        };

        let rendered = to_markdown(&document);
        assert!(
            rendered.ends_with("## Recommendations\n\n1. Continue monitoring sprint progress.\n"),
            "{rendered}"
        );
    }
}
