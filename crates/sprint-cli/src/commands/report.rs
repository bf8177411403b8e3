use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use sprint_config::SprintConfig;
use sprint_narrative::ChatRenderer;
use sprint_report::{Block, Document, NarrativeRenderer, assemble, to_markdown};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReportArgs;
use crate::commands::shared;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct ReportSummary {
    path: String,
    title: String,
    sections: usize,
    findings: usize,
    narrative_fallback: bool,
}

/// Handle `sprint report`.
pub async fn handle(args: &ReportArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = shared::load_config(flags)?;
    let result = shared::run_analysis(&args.source, &config).await?;

    let renderer = if args.no_narrative {
        None
    } else {
        narrative_renderer(&config)?
    };

    let spinner = renderer
        .as_ref()
        .map(|_| Progress::spinner("Writing sprint narrative"));
    let document = assemble(
        &result,
        &config.report,
        renderer.as_ref().map(|r| r as &dyn NarrativeRenderer),
    )
    .await;
    if let Some(spinner) = spinner {
        spinner.finish_clear();
    }

    let body = render_body(&document, args.json)?;
    if args.stdout {
        println!("{body}");
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| default_report_path(result.reference_time().date_naive(), args.json));
    write_report(&path, &body)?;

    output(
        &ReportSummary {
            path: path.display().to_string(),
            title: document.title.clone(),
            sections: document.sections.len(),
            findings: result.findings().len(),
            narrative_fallback: has_fallback(&document),
        },
        flags.format,
    )
}

/// The chat renderer when narration is enabled and has a key.
fn narrative_renderer(config: &SprintConfig) -> anyhow::Result<Option<ChatRenderer>> {
    if !config.narrative.enabled {
        return Ok(None);
    }
    if !config.narrative.is_configured() {
        tracing::warn!(
            "narrative enabled without narrative.api_key; using the structured fallback"
        );
        return Ok(None);
    }
    let renderer = ChatRenderer::new(&config.narrative, &config.http)
        .context("failed to build narrative renderer")?;
    Ok(Some(renderer))
}

fn render_body(document: &Document, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(document)?)
    } else {
        Ok(to_markdown(document))
    }
}

fn default_report_path(date: NaiveDate, json: bool) -> PathBuf {
    let extension = if json { "json" } else { "md" };
    PathBuf::from(format!("sprint_report_{}.{extension}", date.format("%Y-%m-%d")))
}

fn write_report(path: &Path, body: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = body.len(), "report written");
    Ok(())
}

fn has_fallback(document: &Document) -> bool {
    document
        .sections
        .iter()
        .flat_map(|section| &section.body)
        .any(|block| matches!(block, Block::Narrative(narrative) if narrative.is_fallback()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sprint_config::ReportConfig;

    use super::*;
    use crate::commands::shared::tests::fixture_source;

    #[test]
    fn default_path_carries_date_and_extension() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        assert_eq!(
            default_report_path(date, false),
            PathBuf::from("sprint_report_2026-03-20.md")
        );
        assert_eq!(
            default_report_path(date, true),
            PathBuf::from("sprint_report_2026-03-20.json")
        );
    }

    #[test]
    fn disabled_narrative_builds_no_renderer() {
        let config = SprintConfig::default();
        assert!(narrative_renderer(&config).unwrap().is_none());

        let mut keyless = SprintConfig::default();
        keyless.narrative.enabled = true;
        assert!(narrative_renderer(&keyless).unwrap().is_none());
    }

    #[tokio::test]
    async fn sample_board_report_is_written_as_markdown() {
        let config = SprintConfig::default();
        let result = shared::run_analysis(&fixture_source(), &config).await.unwrap();
        let document = assemble(&result, &ReportConfig::default(), None).await;
        assert!(has_fallback(&document));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("sprint.md");
        write_report(&path, &render_body(&document, false).unwrap()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Sprint Health Report: Current Sprint"));
        assert!(written.contains("## Blockers"));
        assert!(written.contains(
            "- **HIGH** the board: completion rate 20.0% is below the 70% target (1 of 5 done)"
        ));
        assert!(written.contains("> Narrative unavailable (no narrative renderer configured)"));
    }

    #[tokio::test]
    async fn json_body_round_trips_through_serde() {
        let config = SprintConfig::default();
        let result = shared::run_analysis(&fixture_source(), &config).await.unwrap();
        let document = assemble(&result, &config.report, None).await;

        let body = render_body(&document, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["title"], "Sprint Health Report: Current Sprint");
        assert_eq!(value["sections"].as_array().unwrap().len(), 6);
    }
}
