//! The assembled report: an ordered sequence of named sections.
//!
//! Serialization is left to callers; [`crate::markdown`] is one renderer and
//! the CLI also emits the document as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sprint_config::SectionKind;
use sprint_core::enums::{Category, Severity};
use sprint_core::finding::Finding;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub subtitle: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

impl Document {
    /// First section with the given name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub kind: SectionKind,
    pub body: Vec<Block>,
}

/// One piece of section content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Note(String),
    Table(Table),
    Findings(Vec<Finding>),
    Recommendations(Vec<Recommendation>),
    Narrative(Narrative),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// An action item derived from exactly one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub severity: Severity,
    /// Key of the finding's subject.
    pub subject: String,
    pub action: String,
}

/// Narrative section content.
///
/// `Fallback` carries the same findings the renderer would have summarized,
/// plus the reason prose is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Narrative {
    Prose { text: String },
    Fallback { reason: String, findings: Vec<Finding> },
}

impl Narrative {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}
