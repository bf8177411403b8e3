//! # sprint-core
//!
//! Core types shared across the sprint health crates.
//!
//! This crate provides:
//! - The immutable board snapshot model (lists, cards, members, comments, activity)
//! - Finding categories, severities and subjects
//! - The immutable [`AnalysisResult`](analysis::AnalysisResult) handed to report assembly
//! - Cross-cutting error types
//! - A retry policy used at the I/O collaborator boundary

pub mod analysis;
pub mod board;
pub mod enums;
pub mod errors;
pub mod finding;
pub mod retry;

use chrono::TimeDelta;

/// Seconds in one day, used when expressing durations as fractional days.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Express a duration as fractional days.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn as_days(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_days_handles_fractions_and_negatives() {
        assert!((as_days(TimeDelta::hours(36)) - 1.5).abs() < f64::EPSILON);
        assert!((as_days(TimeDelta::days(-2)) + 2.0).abs() < f64::EPSILON);
    }
}
