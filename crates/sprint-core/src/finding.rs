use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Category, Severity};

/// What a finding is about.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    /// A single card. Carries the title and assignee names so reports can be
    /// rendered from the analysis result alone.
    Card {
        id: String,
        title: String,
        assignees: Vec<String>,
    },
    Member {
        id: String,
        name: String,
    },
    List {
        id: String,
        name: String,
    },
    Board,
}

impl Subject {
    /// Stable identifier used for deduplication and ordering.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Card { id, .. } => format!("card:{id}"),
            Self::Member { id, .. } => format!("member:{id}"),
            Self::List { id, .. } => format!("list:{id}"),
            Self::Board => "board".to_string(),
        }
    }

    /// Human-readable name of the subject.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Card { title, .. } => title,
            Self::Member { name, .. } | Self::List { name, .. } => name,
            Self::Board => "the board",
        }
    }

    #[must_use]
    pub fn card_id(&self) -> Option<&str> {
        match self {
            Self::Card { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// A categorized observation about sprint health. Compared by content.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Finding {
    pub category: Category,
    pub severity: Severity,
    pub subject: Subject,
    pub message: String,
    /// Metric values that support the finding (days in list, ratios, counts).
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl Finding {
    #[must_use]
    pub fn new(
        category: Category,
        severity: Severity,
        subject: Subject,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            subject,
            message: message.into(),
            metrics: BTreeMap::new(),
        }
    }

    /// Attach a supporting metric value.
    #[must_use]
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    /// Canonical ordering: category, subject key, then message.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.subject.key().cmp(&other.subject.key()))
            .then_with(|| self.message.cmp(&other.message))
    }

    /// Report ordering: severity High→Low, then subject key for stability.
    #[must_use]
    pub fn report_cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .severity
            .cmp(&self.severity)
            .then_with(|| self.subject.key().cmp(&other.subject.key()))
    }
}
