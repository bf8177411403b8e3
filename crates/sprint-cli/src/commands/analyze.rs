use serde::Serialize;
use sprint_core::finding::Finding;

use crate::cli::root_commands::AnalyzeArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared;
use crate::output::output;

/// One finding flattened for `--format table`.
#[derive(Debug, Serialize)]
struct FindingRow<'a> {
    category: &'static str,
    severity: &'static str,
    subject: &'a str,
    message: &'a str,
}

impl<'a> From<&'a Finding> for FindingRow<'a> {
    fn from(finding: &'a Finding) -> Self {
        Self {
            category: finding.category.label(),
            severity: finding.severity.as_str(),
            subject: finding.subject.display_name(),
            message: &finding.message,
        }
    }
}

/// Handle `sprint analyze`.
pub async fn handle(args: &AnalyzeArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = shared::load_config(flags)?;
    let result = shared::run_analysis(&args.source, &config).await?;

    if flags.format == OutputFormat::Table {
        let rows: Vec<FindingRow<'_>> = result.findings().iter().map(FindingRow::from).collect();
        return output(&rows, flags.format);
    }
    output(&result, flags.format)
}
