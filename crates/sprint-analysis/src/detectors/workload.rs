//! Uneven open-card distribution across members.
//!
//! Two findings are possible:
//! - a board-level finding when max/min open cards per member exceeds `skew_factor`
//! - a member finding for each member above `member_load_multiple` times the mean
//!
//! Members with no open cards are left out of both the min and the mean, so
//! someone on leave does not turn every board into a skewed one.

use std::collections::BTreeMap;

use sprint_core::enums::{Category, Severity};
use sprint_core::finding::{Finding, Subject};

use super::{DetectionInput, Detector};
use crate::error::DetectorError;

pub struct WorkloadDetector;

impl WorkloadDetector {
    /// Open cards per assignee id, zero counts omitted.
    fn open_counts(input: &DetectionInput<'_>) -> Result<BTreeMap<String, usize>, DetectorError> {
        let mut counts = BTreeMap::new();
        for (card, _) in input.open_cards()? {
            for member in &card.assignees {
                *counts.entry(member.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

impl Detector for WorkloadDetector {
    fn name(&self) -> &'static str {
        "workload"
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError> {
        let config = input.config;
        let counts = Self::open_counts(input)?;
        let (Some(&max), Some(&min)) = (counts.values().max(), counts.values().min()) else {
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();

        let board_ratio = max as f64 / min as f64;
        if board_ratio > config.skew_factor {
            let severity = config
                .bands
                .workload_skew
                .classify(board_ratio / config.skew_factor)
                .max(Severity::Medium);
            findings.push(
                Finding::new(
                    Category::WorkloadSkew,
                    severity,
                    Subject::Board,
                    format!(
                        "open cards per member range from {min} to {max} ({board_ratio:.1}x)"
                    ),
                )
                .with_metric("max_open_cards", max as f64)
                .with_metric("min_open_cards", min as f64)
                .with_metric("skew_ratio", board_ratio),
            );
        }

        let mean = counts.values().sum::<usize>() as f64 / counts.len() as f64;
        for (member, &count) in &counts {
            let load = count as f64 / mean;
            if load <= config.member_load_multiple {
                continue;
            }
            let severity = config
                .bands
                .workload_skew
                .classify(load / config.member_load_multiple)
                .max(Severity::Medium);
            findings.push(
                Finding::new(
                    Category::WorkloadSkew,
                    severity,
                    Subject::Member {
                        id: member.clone(),
                        name: input.snapshot.member_name(member).to_string(),
                    },
                    format!("holds {count} open cards, {load:.1}x the team mean of {mean:.1}"),
                )
                .with_metric("open_cards", count as f64)
                .with_metric("team_mean", mean)
                .with_metric("load_ratio", load),
            );
        }

        Ok(findings)
    }
}
