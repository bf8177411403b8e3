//! Detector thresholds and list roles.
//!
//! Every value a detector compares against lives here. The struct is built
//! once at startup and passed by reference into `analyze`; detectors never
//! read configuration from anywhere else.

use serde::{Deserialize, Serialize};
use sprint_core::enums::Severity;

use crate::ConfigError;

const fn default_blocker_age_days() -> f64 {
    3.0
}

const fn default_staleness_days() -> f64 {
    5.0
}

const fn default_near_due_days() -> f64 {
    3.0
}

const fn default_skew_factor() -> f64 {
    3.0
}

const fn default_member_load_multiple() -> f64 {
    1.5
}

const fn default_low_activity_grace_days() -> f64 {
    2.0
}

const fn default_bottleneck_factor() -> f64 {
    1.5
}

const fn default_bottleneck_min_cards() -> usize {
    3
}

fn default_terminal_lists() -> Vec<String> {
    vec!["Done".to_string()]
}

fn default_blocked_lists() -> Vec<String> {
    vec!["Blocked".to_string()]
}

fn default_blocking_labels() -> Vec<String> {
    vec!["blocked".to_string(), "blocker".to_string()]
}

fn default_blocker_keywords() -> Vec<String> {
    vec!["blocker".to_string()]
}

fn default_blocking_label_colors() -> Vec<String> {
    vec!["red".to_string()]
}

const fn default_completion_target_pct() -> f64 {
    70.0
}

const fn default_completion_critical_pct() -> f64 {
    50.0
}

/// Maps a ratio (observed value / configured threshold) onto a severity.
///
/// `ratio > high_at` is High, `ratio > medium_at` is Medium, anything else Low.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SeverityBands {
    pub medium_at: f64,
    pub high_at: f64,
}

impl SeverityBands {
    #[must_use]
    pub const fn new(medium_at: f64, high_at: f64) -> Self {
        Self { medium_at, high_at }
    }

    #[must_use]
    pub fn classify(&self, ratio: f64) -> Severity {
        if ratio > self.high_at {
            Severity::High
        } else if ratio > self.medium_at {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// Per-category severity bands.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeverityBandsConfig {
    /// Ratio of days in the blocked state to `blocker_age_days`. Blockers are never below Medium.
    #[serde(default = "SeverityBandsConfig::default_blocker")]
    pub blocker: SeverityBands,

    /// Ratio of days since last activity to `staleness_days`.
    #[serde(default = "SeverityBandsConfig::default_stale")]
    pub stale: SeverityBands,

    /// Ratio of the observed skew to the configured factor or multiple. Never below Medium.
    #[serde(default = "SeverityBandsConfig::default_workload_skew")]
    pub workload_skew: SeverityBands,

    /// Ratio of days in list to `low_activity_grace_days`.
    #[serde(default = "SeverityBandsConfig::default_low_activity")]
    pub low_activity: SeverityBands,

    /// Ratio of a list's card count to the mean over work-in-progress lists. Never below Medium.
    #[serde(default = "SeverityBandsConfig::default_bottleneck")]
    pub bottleneck: SeverityBands,
}

impl SeverityBandsConfig {
    const fn default_blocker() -> SeverityBands {
        SeverityBands::new(1.0, 2.0)
    }

    const fn default_stale() -> SeverityBands {
        SeverityBands::new(2.0, 3.0)
    }

    const fn default_workload_skew() -> SeverityBands {
        SeverityBands::new(1.0, 2.0)
    }

    const fn default_low_activity() -> SeverityBands {
        SeverityBands::new(2.0, 3.0)
    }

    const fn default_bottleneck() -> SeverityBands {
        SeverityBands::new(1.5, 2.0)
    }

    fn entries(&self) -> [(&'static str, SeverityBands); 5] {
        [
            ("analysis.bands.blocker", self.blocker),
            ("analysis.bands.stale", self.stale),
            ("analysis.bands.workload_skew", self.workload_skew),
            ("analysis.bands.low_activity", self.low_activity),
            ("analysis.bands.bottleneck", self.bottleneck),
        ]
    }
}

impl Default for SeverityBandsConfig {
    fn default() -> Self {
        Self {
            blocker: Self::default_blocker(),
            stale: Self::default_stale(),
            workload_skew: Self::default_workload_skew(),
            low_activity: Self::default_low_activity(),
            bottleneck: Self::default_bottleneck(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Days an unassigned card may sit in one list before it counts as blocked.
    /// Also the unit for blocker severity.
    #[serde(default = "default_blocker_age_days")]
    pub blocker_age_days: f64,

    /// Days without any activity before an open card is stale.
    #[serde(default = "default_staleness_days")]
    pub staleness_days: f64,

    /// Cards due within this many days are at risk.
    #[serde(default = "default_near_due_days")]
    pub near_due_days: f64,

    /// Board-level skew fires when max/min open cards per member exceeds this.
    #[serde(default = "default_skew_factor")]
    pub skew_factor: f64,

    /// A member is overloaded above this multiple of the mean open-card count.
    #[serde(default = "default_member_load_multiple")]
    pub member_load_multiple: f64,

    /// Days a silent card may sit in a non-initial list.
    #[serde(default = "default_low_activity_grace_days")]
    pub low_activity_grace_days: f64,

    /// A list is a bottleneck above this multiple of the mean cards per list.
    #[serde(default = "default_bottleneck_factor")]
    pub bottleneck_factor: f64,

    /// Lists with fewer cards than this are never bottlenecks.
    #[serde(default = "default_bottleneck_min_cards")]
    pub bottleneck_min_cards: usize,

    /// List names whose cards count as done (case-insensitive).
    #[serde(default = "default_terminal_lists")]
    pub terminal_lists: Vec<String>,

    /// List names that mark every card in them as blocked (case-insensitive).
    #[serde(default = "default_blocked_lists")]
    pub blocked_lists: Vec<String>,

    /// Labels that mark a card as blocked (case-insensitive).
    #[serde(default = "default_blocking_labels")]
    pub blocking_labels: Vec<String>,

    /// Label colors that mark a card as blocked whatever the label is named.
    #[serde(default = "default_blocking_label_colors")]
    pub blocking_label_colors: Vec<String>,

    /// Comment substrings that mark a card as blocked (case-insensitive).
    #[serde(default = "default_blocker_keywords")]
    pub blocker_keywords: Vec<String>,

    /// Board completion percentage below which the sprint is at risk.
    #[serde(default = "default_completion_target_pct")]
    pub completion_target_pct: f64,

    /// Completion percentage below which that risk is High.
    #[serde(default = "default_completion_critical_pct")]
    pub completion_critical_pct: f64,

    #[serde(default)]
    pub bands: SeverityBandsConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            blocker_age_days: default_blocker_age_days(),
            staleness_days: default_staleness_days(),
            near_due_days: default_near_due_days(),
            skew_factor: default_skew_factor(),
            member_load_multiple: default_member_load_multiple(),
            low_activity_grace_days: default_low_activity_grace_days(),
            bottleneck_factor: default_bottleneck_factor(),
            bottleneck_min_cards: default_bottleneck_min_cards(),
            terminal_lists: default_terminal_lists(),
            blocked_lists: default_blocked_lists(),
            blocking_labels: default_blocking_labels(),
            blocking_label_colors: default_blocking_label_colors(),
            blocker_keywords: default_blocker_keywords(),
            completion_target_pct: default_completion_target_pct(),
            completion_critical_pct: default_completion_critical_pct(),
            bands: SeverityBandsConfig::default(),
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub fn is_terminal_list(&self, list_name: &str) -> bool {
        contains_ignore_case(&self.terminal_lists, list_name)
    }

    #[must_use]
    pub fn is_blocked_list(&self, list_name: &str) -> bool {
        contains_ignore_case(&self.blocked_lists, list_name)
    }

    #[must_use]
    pub fn is_blocking_label(&self, label: &str) -> bool {
        contains_ignore_case(&self.blocking_labels, label)
    }

    #[must_use]
    pub fn is_blocking_label_color(&self, color: &str) -> bool {
        contains_ignore_case(&self.blocking_label_colors, color)
    }

    /// First configured blocker keyword found in `text`, if any.
    #[must_use]
    pub fn blocker_keyword_in(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.blocker_keywords
            .iter()
            .find(|keyword| !keyword.is_empty() && lower.contains(&keyword.to_lowercase()))
            .map(String::as_str)
    }

    /// Reject thresholds and bands that would make detectors meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("analysis.blocker_age_days", self.blocker_age_days),
            ("analysis.staleness_days", self.staleness_days),
            ("analysis.skew_factor", self.skew_factor),
            ("analysis.member_load_multiple", self.member_load_multiple),
            ("analysis.low_activity_grace_days", self.low_activity_grace_days),
            ("analysis.bottleneck_factor", self.bottleneck_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        if !self.near_due_days.is_finite() || self.near_due_days < 0.0 {
            return Err(ConfigError::invalid(
                "analysis.near_due_days",
                format!("must be >= 0, got {}", self.near_due_days),
            ));
        }

        let target = self.completion_target_pct;
        let critical = self.completion_critical_pct;
        if !(0.0..=100.0).contains(&target) {
            return Err(ConfigError::invalid(
                "analysis.completion_target_pct",
                format!("must be within 0..=100, got {target}"),
            ));
        }
        if !(0.0..=target).contains(&critical) {
            return Err(ConfigError::invalid(
                "analysis.completion_critical_pct",
                format!("must be within 0..={target}, got {critical}"),
            ));
        }

        for (field, bands) in self.bands.entries() {
            if bands.medium_at > bands.high_at {
                return Err(ConfigError::invalid(
                    field,
                    format!(
                        "medium_at ({}) must not exceed high_at ({})",
                        bands.medium_at, bands.high_at
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn contains_ignore_case(haystack: &[String], needle: &str) -> bool {
    haystack
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(needle.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.blocker_age_days - 3.0).abs() < f64::EPSILON);
        assert!((config.near_due_days - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.bottleneck_min_cards, 3);
    }

    #[test]
    fn list_roles_ignore_case() {
        let config = AnalysisConfig::default();
        assert!(config.is_terminal_list("done"));
        assert!(config.is_blocked_list("BLOCKED"));
        assert!(config.is_blocking_label("Blocker"));
        assert!(config.is_blocking_label_color("RED"));
        assert!(!config.is_blocking_label_color("green"));
        assert!(!config.is_terminal_list("In Progress"));
    }

    #[test]
    fn blocker_keyword_matches_substring() {
        let config = AnalysisConfig::default();
        assert_eq!(
            config.blocker_keyword_in("This is a BLOCKER for release"),
            Some("blocker")
        );
        assert_eq!(config.blocker_keyword_in("all good"), None);
    }

    #[test]
    fn bands_classify_ratios() {
        let bands = SeverityBands::new(2.0, 3.0);
        assert_eq!(bands.classify(1.5), Severity::Low);
        assert_eq!(bands.classify(2.0), Severity::Low);
        assert_eq!(bands.classify(2.5), Severity::Medium);
        assert_eq!(bands.classify(3.1), Severity::High);
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let config = AnalysisConfig {
            staleness_days: 0.0,
            ..AnalysisConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis.staleness_days"));
    }

    #[test]
    fn validate_rejects_inverted_bands() {
        let mut config = AnalysisConfig::default();
        config.bands.stale = SeverityBands::new(4.0, 3.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis.bands.stale"));
    }

    #[test]
    fn validate_rejects_critical_above_target() {
        let config = AnalysisConfig {
            completion_target_pct: 60.0,
            completion_critical_pct: 80.0,
            ..AnalysisConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis.completion_critical_pct"));
    }

    #[test]
    fn bottleneck_bands_are_validated() {
        let mut config = AnalysisConfig::default();
        config.bands.bottleneck = SeverityBands::new(3.0, 2.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis.bands.bottleneck"));
    }
}
