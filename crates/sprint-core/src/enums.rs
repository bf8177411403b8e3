//! Finding categories, severities and activity kinds.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Declaration order is meaningful: `Ord` is derived and used for canonical
//! finding order and severity comparison.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of a finding. Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// All severities from most to least severe.
    pub const DESCENDING: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Category of a sprint-health finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Blocker,
    Stale,
    OverdueRisk,
    WorkloadSkew,
    LowActivity,
    Bottleneck,
    CompletionRisk,
}

impl Category {
    /// Every category, in canonical order.
    pub const ALL: [Self; 7] = [
        Self::Blocker,
        Self::Stale,
        Self::OverdueRisk,
        Self::WorkloadSkew,
        Self::LowActivity,
        Self::Bottleneck,
        Self::CompletionRisk,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocker => "blocker",
            Self::Stale => "stale",
            Self::OverdueRisk => "overdue_risk",
            Self::WorkloadSkew => "workload_skew",
            Self::LowActivity => "low_activity",
            Self::Bottleneck => "bottleneck",
            Self::CompletionRisk => "completion_risk",
        }
    }

    /// Human-readable label used in report tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Blocker => "Blocker",
            Self::Stale => "Stale",
            Self::OverdueRisk => "Overdue risk",
            Self::WorkloadSkew => "Workload skew",
            Self::LowActivity => "Low activity",
            Self::Bottleneck => "Bottleneck",
            Self::CompletionRisk => "Completion risk",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActivityKind
// ---------------------------------------------------------------------------

/// Kind of a card activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    Moved,
    Assigned,
    Commented,
    Labeled,
}

impl ActivityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Moved => "moved",
            Self::Assigned => "assigned",
            Self::Commented => "commented",
            Self::Labeled => "labeled",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
