//! Report naming and the section template.
//!
//! The template is an ordered list of sections. TOML form:
//!
//! ```toml
//! [[report.sections]]
//! title = "Summary"
//! kind = "summary"
//!
//! [[report.sections]]
//! title = "What needs attention"
//! kind = "narrative"
//! categories = ["blocker", "overdue_risk"]
//! ```

use serde::{Deserialize, Serialize};
use sprint_core::enums::Category;

use crate::ConfigError;

fn default_sprint_name() -> String {
    "Current Sprint".to_string()
}

fn default_team_name() -> String {
    "Development Team".to_string()
}

/// Recognized section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Card counts per list and finding totals.
    Summary,
    /// Blocker findings, most severe first.
    Blockers,
    /// Overdue and near-due findings, most severe first.
    Deadlines,
    /// Workload table plus workload-skew findings.
    TeamPerformance,
    /// One action item per finding.
    Recommendations,
    /// Prose from the narrative renderer over a subset of findings.
    Narrative,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SectionSpec {
    pub title: String,
    pub kind: SectionKind,
    /// Narrative sections only: categories to summarize. Empty means all.
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl SectionSpec {
    #[must_use]
    pub fn new(title: &str, kind: SectionKind) -> Self {
        Self {
            title: title.to_string(),
            kind,
            categories: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_categories(mut self, categories: &[Category]) -> Self {
        self.categories = categories.to_vec();
        self
    }

    /// Whether a finding of `category` belongs in this section's subset.
    #[must_use]
    pub fn includes(&self, category: Category) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }
}

/// Ordered sections of a report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SectionTemplate {
    pub sections: Vec<SectionSpec>,
}

impl Default for SectionTemplate {
    fn default() -> Self {
        Self {
            sections: vec![
                SectionSpec::new("Sprint Summary", SectionKind::Summary),
                SectionSpec::new("Blockers", SectionKind::Blockers),
                SectionSpec::new("Deadlines", SectionKind::Deadlines),
                SectionSpec::new("Team Performance", SectionKind::TeamPerformance),
                SectionSpec::new("Sprint Narrative", SectionKind::Narrative),
                SectionSpec::new("Recommendations", SectionKind::Recommendations),
            ],
        }
    }
}

impl SectionTemplate {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.is_empty() {
            return Err(ConfigError::invalid(
                "report.sections",
                "template must contain at least one section",
            ));
        }
        if let Some(blank) = self.sections.iter().position(|s| s.title.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "report.sections",
                format!("section {} has an empty title", blank + 1),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_sprint_name")]
    pub sprint_name: String,

    #[serde(default = "default_team_name")]
    pub team_name: String,

    #[serde(default)]
    pub sections: SectionTemplate,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sprint_name: default_sprint_name(),
            team_name: default_team_name(),
            sections: SectionTemplate::default(),
        }
    }
}
