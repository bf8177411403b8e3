use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Analyze a board and print findings.
    Analyze(AnalyzeArgs),
    /// Analyze a board and write the sprint health report.
    Report(ReportArgs),
    /// Fetch a board from Trello and save it as a snapshot file.
    Fetch(FetchArgs),
    /// Show the effective configuration with secrets redacted.
    Config,
    /// Print the JSON schema of the snapshot file format.
    Schema,
}

/// Where the board snapshot comes from.
#[derive(Clone, Debug, Args)]
pub struct SourceArgs {
    /// Read a snapshot file instead of calling Trello.
    #[arg(long, conflicts_with = "board")]
    pub snapshot: Option<PathBuf>,
    /// Trello board id (defaults to `trello.board_id`).
    #[arg(long)]
    pub board: Option<String>,
    /// Reference time for age computations (defaults to the capture time).
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

/// Arguments for `sprint analyze`.
#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for `sprint report`.
#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output path (defaults to `sprint_report_<date>.md` or `.json`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Write the report document as JSON instead of markdown.
    #[arg(long)]
    pub json: bool,
    /// Print the report to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
    /// Skip the narrative renderer even when it is configured.
    #[arg(long)]
    pub no_narrative: bool,
}

/// Arguments for `sprint fetch`.
#[derive(Clone, Debug, Args)]
pub struct FetchArgs {
    /// Trello board id (defaults to `trello.board_id`).
    #[arg(long)]
    pub board: Option<String>,
    /// Snapshot file to write.
    #[arg(short, long)]
    pub output: PathBuf,
}
