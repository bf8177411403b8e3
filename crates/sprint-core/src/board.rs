//! Board snapshot model.
//!
//! A [`BoardSnapshot`] is a point-in-time capture of a project board. Loaders
//! produce it once per run; everything downstream only borrows it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ActivityKind;

/// Point-in-time capture of a board.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BoardSnapshot {
    pub board_id: String,
    #[serde(default)]
    pub board_name: String,
    pub captured_at: DateTime<Utc>,
    pub lists: Vec<BoardList>,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// A named column on the board ("To Do", "In Progress", "Done", ...).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BoardList {
    pub id: String,
    pub name: String,
    /// Position on the board; lower sorts first.
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub closed: bool,
}

/// A unit of work. Belongs to exactly one list at snapshot time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub list_id: String,
    #[serde(default)]
    pub assignees: BTreeSet<String>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_complete: bool,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Lowercase colors of the card's labels, named or not.
    #[serde(default)]
    pub label_colors: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    /// Effort estimate (story points, hours) when the board tracks one.
    #[serde(default)]
    pub estimate: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub activity: Vec<ActivityEvent>,
}

/// A board member that cards can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Comment {
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
}

/// A timestamped change to a card.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub from_list: Option<String>,
    #[serde(default)]
    pub to_list: Option<String>,
}

impl BoardSnapshot {
    /// Lists in board order (position, then id for ties).
    #[must_use]
    pub fn ordered_lists(&self) -> Vec<&BoardList> {
        let mut lists: Vec<&BoardList> = self.lists.iter().collect();
        lists.sort_by(|a, b| {
            a.position
                .total_cmp(&b.position)
                .then_with(|| a.id.cmp(&b.id))
        });
        lists
    }

    #[must_use]
    pub fn list(&self, id: &str) -> Option<&BoardList> {
        self.lists.iter().find(|list| list.id == id)
    }

    #[must_use]
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    #[must_use]
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Display name for a member id, falling back to the id itself.
    #[must_use]
    pub fn member_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.member(id).map_or(id, |member| member.display_name.as_str())
    }

    /// The first open list in board order, where new work usually lands.
    #[must_use]
    pub fn initial_list(&self) -> Option<&BoardList> {
        self.ordered_lists().into_iter().find(|list| !list.closed)
    }
}

impl Card {
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(label))
    }

    /// Timestamp of the most recent move into `list_id`, if the card was ever moved there.
    #[must_use]
    pub fn last_move_into(&self, list_id: &str) -> Option<DateTime<Utc>> {
        self.activity
            .iter()
            .filter(|event| {
                event.kind == ActivityKind::Moved && event.to_list.as_deref() == Some(list_id)
            })
            .map(|event| event.at)
            .max()
    }

    /// Timestamp of the latest activity: events and comments, creation if none.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        let events = self.activity.iter().map(|event| event.at);
        let comments = self.comments.iter().map(|comment| comment.created_at);
        events
            .chain(comments)
            .max()
            .map_or(self.created_at, |latest| latest.max(self.created_at))
    }

    /// Number of activity events other than the card's creation.
    #[must_use]
    pub fn non_creation_events(&self) -> usize {
        self.activity
            .iter()
            .filter(|event| event.kind != ActivityKind::Created)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
    }

    fn card() -> Card {
        Card {
            id: "c1".into(),
            title: "Wire up login".into(),
            list_id: "doing".into(),
            assignees: BTreeSet::new(),
            due: None,
            due_complete: false,
            labels: BTreeSet::from(["Blocked".to_string()]),
            label_colors: BTreeSet::from(["red".to_string()]),
            created_at: at(1),
            estimate: None,
            url: None,
            comments: Vec::new(),
            activity: vec![
                ActivityEvent {
                    kind: ActivityKind::Created,
                    at: at(1),
                    from_list: None,
                    to_list: Some("todo".into()),
                },
                ActivityEvent {
                    kind: ActivityKind::Moved,
                    at: at(3),
                    from_list: Some("todo".into()),
                    to_list: Some("doing".into()),
                },
            ],
        }
    }

    #[test]
    fn label_lookup_ignores_case() {
        assert!(card().has_label("blocked"));
        assert!(!card().has_label("urgent"));
    }

    #[test]
    fn last_move_into_finds_latest_move() {
        let card = card();
        assert_eq!(card.last_move_into("doing"), Some(at(3)));
        assert_eq!(card.last_move_into("done"), None);
    }

    #[test]
    fn last_activity_includes_comments() {
        let mut card = card();
        card.comments.push(Comment {
            author_id: "m1".into(),
            created_at: at(7),
            text: "still waiting on API keys".into(),
        });
        assert_eq!(card.last_activity(), at(7));
        assert_eq!(card.non_creation_events(), 1);
    }

    #[test]
    fn ordered_lists_follow_position() {
        let snapshot = BoardSnapshot {
            board_id: "b".into(),
            board_name: String::new(),
            captured_at: at(10),
            lists: vec![
                BoardList {
                    id: "done".into(),
                    name: "Done".into(),
                    position: 3.0,
                    closed: false,
                },
                BoardList {
                    id: "todo".into(),
                    name: "To Do".into(),
                    position: 1.0,
                    closed: false,
                },
            ],
            cards: Vec::new(),
            members: Vec::new(),
        };
        let names: Vec<&str> = snapshot.ordered_lists().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["To Do", "Done"]);
        assert_eq!(snapshot.initial_list().map(|l| l.id.as_str()), Some("todo"));
        assert_eq!(snapshot.member_name("ghost"), "ghost");
    }
}
