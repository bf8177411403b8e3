//! Config, snapshot and analysis plumbing shared by the subcommands.

use std::path::PathBuf;

use anyhow::Context;
use sprint_analysis::{analyze, default_detectors};
use sprint_board::{TrelloClient, load_snapshot_file};
use sprint_config::SprintConfig;
use sprint_core::analysis::AnalysisResult;
use sprint_core::board::BoardSnapshot;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SourceArgs;
use crate::progress::Progress;

/// Project root from `--project`, else the current directory.
pub fn project_root(flags: &GlobalFlags) -> anyhow::Result<PathBuf> {
    match flags.project.as_deref() {
        Some(path) => {
            let root = PathBuf::from(path);
            if !root.is_dir() {
                anyhow::bail!("invalid --project '{}': directory does not exist", root.display());
            }
            Ok(root)
        }
        None => std::env::current_dir().context("failed to read current directory"),
    }
}

/// Load `.env` and the layered configuration from the project root, then validate it.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SprintConfig> {
    let root = project_root(flags)?;
    let config = SprintConfig::load_with_dotenv(&root).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Fetch a board from Trello behind a spinner.
pub async fn fetch_board(config: &SprintConfig, board_id: &str) -> anyhow::Result<BoardSnapshot> {
    let client = TrelloClient::new(&config.trello, &config.http)?;
    let spinner = Progress::spinner(&format!("Fetching board {board_id} from Trello"));
    match client.fetch_snapshot(board_id).await {
        Ok(snapshot) => {
            spinner.finish_clear();
            Ok(snapshot)
        }
        Err(error) => {
            spinner.finish_err("Board fetch failed");
            Err(error).with_context(|| format!("failed to fetch board {board_id}"))
        }
    }
}

/// Capture the snapshot once: from `--snapshot` when given, otherwise from Trello.
pub async fn load_snapshot(
    source: &SourceArgs,
    config: &SprintConfig,
) -> anyhow::Result<BoardSnapshot> {
    if let Some(path) = &source.snapshot {
        return load_snapshot_file(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()));
    }
    let board_id = config.board_id(source.board.as_deref())?;
    fetch_board(config, board_id).await
}

/// Load the snapshot and run every detector against it.
///
/// The reference time is `--at` when given, else the capture time, so a
/// saved snapshot always yields the same findings.
pub async fn run_analysis(
    source: &SourceArgs,
    config: &SprintConfig,
) -> anyhow::Result<AnalysisResult> {
    let snapshot = load_snapshot(source, config).await?;
    let reference_time = source.at.unwrap_or(snapshot.captured_at);

    let result = analyze(&snapshot, &default_detectors(), &config.analysis, reference_time)
        .context("analysis failed")?;

    for failure in result.detector_failures() {
        tracing::warn!(
            detector = %failure.detector,
            error = %failure.error,
            "detector failed; its category is missing from this run"
        );
    }
    Ok(result)
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use sprint_core::enums::{Category, Severity};

    use super::*;
    use crate::cli::OutputFormat;

    pub(crate) fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../sprint-core/tests/fixtures/sprint_board.json")
    }

    pub(crate) fn fixture_source() -> SourceArgs {
        SourceArgs {
            snapshot: Some(fixture_path()),
            board: None,
            at: None,
        }
    }

    fn flags(project: Option<String>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: true,
            verbose: false,
            project,
        }
    }

    #[tokio::test]
    async fn snapshot_analysis_uses_capture_time() {
        let result = run_analysis(&fixture_source(), &SprintConfig::default())
            .await
            .unwrap();

        assert_eq!(
            result.reference_time(),
            Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap()
        );
        let found: Vec<(Category, String, Severity)> = result
            .findings()
            .iter()
            .map(|f| (f.category, f.subject.key(), f.severity))
            .collect();
        assert_eq!(
            found,
            [
                (Category::Blocker, "card:c-refunds".to_string(), Severity::Medium),
                (Category::Stale, "card:c-3ds".to_string(), Severity::High),
                (Category::OverdueRisk, "card:c-3ds".to_string(), Severity::Medium),
                (Category::OverdueRisk, "card:c-ledger".to_string(), Severity::High),
                (Category::CompletionRisk, "board".to_string(), Severity::High),
            ]
        );
        assert!(result.detector_failures().is_empty());
    }

    #[tokio::test]
    async fn missing_snapshot_file_is_an_error() {
        let source = SourceArgs {
            snapshot: Some(PathBuf::from("/nonexistent/board.json")),
            board: None,
            at: None,
        };
        let error = run_analysis(&source, &SprintConfig::default())
            .await
            .unwrap_err();
        assert!(format!("{error:#}").contains("failed to load snapshot"));
    }

    #[tokio::test]
    async fn board_source_without_board_id_is_an_error() {
        let source = SourceArgs {
            snapshot: None,
            board: None,
            at: None,
        };
        assert!(load_snapshot(&source, &SprintConfig::default()).await.is_err());
    }

    #[test]
    fn project_root_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let ok = project_root(&flags(Some(dir.path().display().to_string()))).unwrap();
        assert_eq!(ok, dir.path());
        assert!(project_root(&flags(Some("/nonexistent/project".into()))).is_err());
    }
}
