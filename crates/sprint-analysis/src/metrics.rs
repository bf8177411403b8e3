//! Per-card metric extraction.
//!
//! [`extract`] is pure: the same snapshot and reference time always yield the
//! same metrics. The reference time is an argument, never the system clock.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sprint_core::as_days;
use sprint_core::board::BoardSnapshot;
use sprint_core::errors::CoreError;

/// Derived facts about one card at the reference time. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMetrics {
    pub card_id: String,
    pub list_id: String,
    pub list_name: String,
    /// Days since the card was created.
    pub age_days: f64,
    /// Days since the card last moved into its current list (creation if never moved).
    pub days_in_list: f64,
    /// Days until the due date; negative when overdue.
    pub days_until_due: Option<f64>,
    /// Days since the latest event or comment.
    pub days_since_activity: f64,
    pub assignee_count: usize,
    pub comment_count: usize,
    pub non_creation_events: usize,
    pub in_initial_list: bool,
}

pub type MetricsMap = BTreeMap<String, CardMetrics>;

/// Compute metrics for every card in `snapshot` as of `reference_time`.
///
/// # Errors
///
/// Returns [`CoreError::MalformedSnapshot`] when a card references a list
/// missing from the snapshot or two cards share an id.
pub fn extract(
    snapshot: &BoardSnapshot,
    reference_time: DateTime<Utc>,
) -> Result<MetricsMap, CoreError> {
    let initial_list = snapshot.initial_list().map(|list| list.id.as_str());
    let mut seen = BTreeSet::new();
    let mut metrics = MetricsMap::new();

    for card in &snapshot.cards {
        if !seen.insert(card.id.as_str()) {
            return Err(CoreError::MalformedSnapshot(format!(
                "duplicate card id {}",
                card.id
            )));
        }

        let list = snapshot
            .list(&card.list_id)
            .ok_or_else(|| CoreError::unknown_list(&card.id, &card.list_id))?;

        let entered_list = card
            .last_move_into(&card.list_id)
            .unwrap_or(card.created_at);

        metrics.insert(
            card.id.clone(),
            CardMetrics {
                card_id: card.id.clone(),
                list_id: list.id.clone(),
                list_name: list.name.clone(),
                age_days: as_days(reference_time - card.created_at),
                days_in_list: as_days(reference_time - entered_list),
                days_until_due: card.due.map(|due| as_days(due - reference_time)),
                days_since_activity: as_days(reference_time - card.last_activity()),
                assignee_count: card.assignees.len(),
                comment_count: card.comments.len(),
                non_creation_events: card.non_creation_events(),
                in_initial_list: initial_list == Some(list.id.as_str()),
            },
        );
    }

    tracing::debug!(cards = metrics.len(), "extracted card metrics");
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::TimeZone;
    use sprint_core::board::{ActivityEvent, BoardList, Card};
    use sprint_core::enums::ActivityKind;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn snapshot(cards: Vec<Card>) -> BoardSnapshot {
        BoardSnapshot {
            board_id: "b".into(),
            board_name: "Board".into(),
            captured_at: at(20, 12),
            lists: vec![
                BoardList {
                    id: "todo".into(),
                    name: "To Do".into(),
                    position: 1.0,
                    closed: false,
                },
                BoardList {
                    id: "doing".into(),
                    name: "In Progress".into(),
                    position: 2.0,
                    closed: false,
                },
            ],
            cards,
            members: Vec::new(),
        }
    }

    fn card(id: &str, list: &str) -> Card {
        Card {
            id: id.into(),
            title: id.into(),
            list_id: list.into(),
            assignees: BTreeSet::from(["m1".to_string()]),
            due: Some(at(18, 12)),
            due_complete: false,
            labels: BTreeSet::new(),
            label_colors: BTreeSet::new(),
            created_at: at(10, 12),
            estimate: None,
            url: None,
            comments: Vec::new(),
            activity: vec![
                ActivityEvent {
                    kind: ActivityKind::Created,
                    at: at(10, 12),
                    from_list: None,
                    to_list: Some("todo".into()),
                },
                ActivityEvent {
                    kind: ActivityKind::Moved,
                    at: at(15, 0),
                    from_list: Some("todo".into()),
                    to_list: Some("doing".into()),
                },
            ],
        }
    }

    #[test]
    fn computes_time_deltas_in_days() {
        let snapshot = snapshot(vec![card("c1", "doing")]);
        let metrics = extract(&snapshot, at(20, 12)).unwrap();
        let m = &metrics["c1"];

        assert!((m.age_days - 10.0).abs() < 1e-9);
        assert!((m.days_in_list - 5.5).abs() < 1e-9);
        assert!((m.days_until_due.unwrap() + 2.0).abs() < 1e-9);
        assert!((m.days_since_activity - 5.5).abs() < 1e-9);
        assert_eq!(m.list_name, "In Progress");
        assert_eq!(m.assignee_count, 1);
        assert_eq!(m.non_creation_events, 1);
        assert!(!m.in_initial_list);
    }

    #[test]
    fn never_moved_card_counts_from_creation() {
        let mut c = card("c1", "todo");
        c.activity.truncate(1);
        let metrics = extract(&snapshot(vec![c]), at(20, 12)).unwrap();
        assert!((metrics["c1"].days_in_list - 10.0).abs() < 1e-9);
        assert!(metrics["c1"].in_initial_list);
    }

    #[test]
    fn unknown_list_is_malformed() {
        let err = extract(&snapshot(vec![card("c1", "ghost")]), at(20, 12)).unwrap_err();
        assert!(matches!(err, CoreError::MalformedSnapshot(ref msg) if msg.contains("ghost")));
    }

    #[test]
    fn duplicate_card_ids_are_malformed() {
        let snapshot = snapshot(vec![card("c1", "todo"), card("c1", "doing")]);
        assert!(matches!(
            extract(&snapshot, at(20, 12)),
            Err(CoreError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn extraction_is_deterministic() {
        let snapshot = snapshot(vec![card("c1", "doing"), card("c2", "todo")]);
        assert_eq!(
            extract(&snapshot, at(20, 12)).unwrap(),
            extract(&snapshot, at(20, 12)).unwrap()
        );
    }
}
