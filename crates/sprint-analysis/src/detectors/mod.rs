//! Finding detectors.
//!
//! Each detector covers one [`Category`](sprint_core::enums::Category) and
//! reads only the snapshot, the extracted metrics, and the analysis config.
//! Detectors are independent of one another, so the analyzer may run them in
//! any order or in parallel.

mod blocker;
mod bottleneck;
mod completion;
mod low_activity;
mod overdue;
mod stale;
mod workload;

pub use blocker::BlockerDetector;
pub use bottleneck::BottleneckDetector;
pub use completion::CompletionDetector;
pub use low_activity::LowActivityDetector;
pub use overdue::OverdueDetector;
pub use stale::StaleDetector;
pub use workload::WorkloadDetector;

use sprint_config::AnalysisConfig;
use sprint_core::board::{BoardSnapshot, Card};
use sprint_core::finding::{Finding, Subject};

use crate::error::DetectorError;
use crate::metrics::{CardMetrics, MetricsMap};

/// Everything a detector may look at.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    pub snapshot: &'a BoardSnapshot,
    pub metrics: &'a MetricsMap,
    pub config: &'a AnalysisConfig,
}

impl<'a> DetectionInput<'a> {
    #[must_use]
    pub const fn new(
        snapshot: &'a BoardSnapshot,
        metrics: &'a MetricsMap,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            snapshot,
            metrics,
            config,
        }
    }

    /// Metrics for `card`.
    pub fn metrics_for(&self, card: &Card) -> Result<&'a CardMetrics, DetectorError> {
        self.metrics
            .get(&card.id)
            .ok_or_else(|| DetectorError::MissingMetrics {
                card_id: card.id.clone(),
            })
    }

    /// Cards not sitting in a terminal list, paired with their metrics.
    pub fn open_cards(&self) -> Result<Vec<(&'a Card, &'a CardMetrics)>, DetectorError> {
        let mut open = Vec::new();
        for card in &self.snapshot.cards {
            let metrics = self.metrics_for(card)?;
            if !self.config.is_terminal_list(&metrics.list_name) {
                open.push((card, metrics));
            }
        }
        Ok(open)
    }

    /// Subject for `card`, with assignee ids resolved to display names.
    #[must_use]
    pub fn card_subject(&self, card: &Card) -> Subject {
        Subject::Card {
            id: card.id.clone(),
            title: card.title.clone(),
            assignees: card
                .assignees
                .iter()
                .map(|id| self.snapshot.member_name(id).to_string())
                .collect(),
        }
    }
}

/// A single finding rule.
pub trait Detector: Send + Sync {
    /// Stable name used in logs and detector failure records.
    fn name(&self) -> &'static str;

    /// Produce findings for the input. An error only discards this
    /// detector's output, never the whole run.
    fn detect(&self, input: &DetectionInput<'_>) -> Result<Vec<Finding>, DetectorError>;
}

/// The built-in detector set, in a fixed order.
#[must_use]
pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(BlockerDetector),
        Box::new(StaleDetector),
        Box::new(OverdueDetector),
        Box::new(WorkloadDetector),
        Box::new(LowActivityDetector),
        Box::new(BottleneckDetector),
        Box::new(CompletionDetector),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use sprint_core::board::{ActivityEvent, BoardList, BoardSnapshot, Card, Comment, Member};
    use sprint_core::enums::ActivityKind;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap()
    }

    pub fn days_ago(days: f64) -> DateTime<Utc> {
        #[allow(clippy::cast_possible_truncation)]
        let seconds = (days * 86_400.0) as i64;
        now() - TimeDelta::seconds(seconds)
    }

    /// Board with To Do, In Progress, Review, Blocked and Done lists.
    pub fn board(cards: Vec<Card>) -> BoardSnapshot {
        let list = |id: &str, name: &str, position: f64| BoardList {
            id: id.into(),
            name: name.into(),
            position,
            closed: false,
        };
        BoardSnapshot {
            board_id: "board-1".into(),
            board_name: "Sprint Board".into(),
            captured_at: now(),
            lists: vec![
                list("todo", "To Do", 1.0),
                list("doing", "In Progress", 2.0),
                list("review", "Review", 3.0),
                list("blocked", "Blocked", 4.0),
                list("done", "Done", 5.0),
            ],
            cards,
            members: ["ada", "grace", "linus"]
                .into_iter()
                .map(|id| Member {
                    id: id.into(),
                    display_name: format!("{id} name"),
                })
                .collect(),
        }
    }

    /// A card created `created_days_ago` days ago in `list`, never moved, no activity.
    pub fn card(id: &str, list: &str, created_days_ago: f64) -> Card {
        Card {
            id: id.into(),
            title: format!("Card {id}"),
            list_id: list.into(),
            assignees: BTreeSet::new(),
            due: None,
            due_complete: false,
            labels: BTreeSet::new(),
            label_colors: BTreeSet::new(),
            created_at: days_ago(created_days_ago),
            estimate: None,
            url: None,
            comments: Vec::new(),
            activity: vec![ActivityEvent {
                kind: ActivityKind::Created,
                at: days_ago(created_days_ago),
                from_list: None,
                to_list: Some(list.into()),
            }],
        }
    }

    pub fn assigned(mut card: Card, members: &[&str]) -> Card {
        card.assignees = members.iter().map(|m| (*m).to_string()).collect();
        card
    }

    pub fn moved(mut card: Card, from: &str, days_ago_moved: f64) -> Card {
        card.activity.push(ActivityEvent {
            kind: ActivityKind::Moved,
            at: days_ago(days_ago_moved),
            from_list: Some(from.into()),
            to_list: Some(card.list_id.clone()),
        });
        card
    }

    pub fn commented(mut card: Card, text: &str, days_ago_commented: f64) -> Card {
        card.comments.push(Comment {
            author_id: "ada".into(),
            created_at: days_ago(days_ago_commented),
            text: text.into(),
        });
        card
    }
}
