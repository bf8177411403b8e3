//! The immutable output of one analysis run.
//!
//! [`AnalysisResult`] is built once by the analyzer and is the sole input to
//! report assembly. Its fields are private; a new run produces a new result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Category, Severity};
use crate::finding::Finding;

/// Per-member workload, computed directly from the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkloadRow {
    pub member_id: String,
    pub name: String,
    /// Assigned cards not in a terminal list.
    pub open_cards: usize,
    pub total_cards: usize,
    pub completed_cards: usize,
    pub overdue_cards: usize,
    /// Sum of open-card estimates, present only when some assigned card has one.
    pub estimated_effort: Option<f64>,
}

impl WorkloadRow {
    /// Completed share of assigned cards, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_rate(&self) -> f64 {
        if self.total_cards == 0 {
            0.0
        } else {
            self.completed_cards as f64 / self.total_cards as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkloadTable {
    /// One row per board member, in snapshot member order.
    pub rows: Vec<WorkloadRow>,
    /// Open cards nobody is assigned to. They never count toward skew.
    pub unassigned_open_cards: usize,
}

/// Card count for one list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListCount {
    pub list_id: String,
    pub name: String,
    pub cards: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SummaryCounts {
    /// Cards per list in board order, including empty lists.
    pub cards_per_list: Vec<ListCount>,
    pub total_cards: usize,
    pub open_cards: usize,
    pub completed_cards: usize,
    /// Completed share of all cards, as a percentage.
    pub completion_rate: f64,
    pub by_category: BTreeMap<Category, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}

impl SummaryCounts {
    /// Count findings by category and severity, with every key present.
    pub fn tally(&mut self, findings: &[Finding]) {
        self.by_category = Category::ALL.iter().map(|c| (*c, 0)).collect();
        self.by_severity = Severity::DESCENDING.iter().map(|s| (*s, 0)).collect();
        for finding in findings {
            *self.by_category.entry(finding.category).or_default() += 1;
            *self.by_severity.entry(finding.severity).or_default() += 1;
        }
    }
}

/// A detector that failed and was isolated from the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectorFailure {
    pub detector: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    board_id: String,
    board_name: String,
    reference_time: DateTime<Utc>,
    findings: Vec<Finding>,
    workload: WorkloadTable,
    summary: SummaryCounts,
    detector_failures: Vec<DetectorFailure>,
}

impl AnalysisResult {
    #[must_use]
    pub const fn new(
        board_id: String,
        board_name: String,
        reference_time: DateTime<Utc>,
        findings: Vec<Finding>,
        workload: WorkloadTable,
        summary: SummaryCounts,
        detector_failures: Vec<DetectorFailure>,
    ) -> Self {
        Self {
            board_id,
            board_name,
            reference_time,
            findings,
            workload,
            summary,
            detector_failures,
        }
    }

    #[must_use]
    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    #[must_use]
    pub fn board_name(&self) -> &str {
        &self.board_name
    }

    #[must_use]
    pub const fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    /// Findings in canonical order (category, subject, message).
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn findings_in(&self, category: Category) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.category == category)
    }

    #[must_use]
    pub const fn workload(&self) -> &WorkloadTable {
        &self.workload
    }

    #[must_use]
    pub const fn summary(&self) -> &SummaryCounts {
        &self.summary
    }

    #[must_use]
    pub fn detector_failures(&self) -> &[DetectorFailure] {
        &self.detector_failures
    }
}
