//! Conversion of raw Trello data into a [`BoardSnapshot`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sprint_core::board::{ActivityEvent, BoardList, BoardSnapshot, Card, Comment, Member};
use sprint_core::enums::ActivityKind;

use crate::error::BoardError;
use crate::wire::{RawBoard, TrelloAction, TrelloCard, TrelloLabel};

/// Build a snapshot from raw board data.
///
/// `estimate_field` is the id of a numeric custom field used as the effort
/// estimate; empty disables estimates.
///
/// # Errors
///
/// Returns [`BoardError::Malformed`] when a card id does not carry a
/// decodable creation timestamp.
pub fn normalize(
    raw: RawBoard,
    estimate_field: &str,
    captured_at: DateTime<Utc>,
) -> Result<BoardSnapshot, BoardError> {
    let mut actions_by_card: BTreeMap<String, Vec<TrelloAction>> = BTreeMap::new();
    for action in raw.actions {
        if let Some(card) = &action.data.card {
            actions_by_card
                .entry(card.id.clone())
                .or_default()
                .push(action);
        }
    }

    let cards = raw
        .cards
        .into_iter()
        .map(|card| {
            let actions = actions_by_card.remove(&card.id).unwrap_or_default();
            normalize_card(card, actions, estimate_field)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BoardSnapshot {
        board_id: raw.board.id,
        board_name: raw.board.name,
        captured_at,
        lists: raw
            .lists
            .into_iter()
            .map(|list| BoardList {
                id: list.id,
                name: list.name,
                position: list.pos,
                closed: list.closed,
            })
            .collect(),
        cards,
        members: raw
            .members
            .into_iter()
            .map(|member| Member {
                display_name: member
                    .full_name
                    .filter(|name| !name.is_empty())
                    .or(member.username)
                    .unwrap_or_else(|| member.id.clone()),
                id: member.id,
            })
            .collect(),
    })
}

fn normalize_card(
    card: TrelloCard,
    actions: Vec<TrelloAction>,
    estimate_field: &str,
) -> Result<Card, BoardError> {
    let created_at = created_at_from_id(&card.id)?;
    let mut activity = Vec::new();
    let mut comments = Vec::new();

    for action in actions {
        let data = &action.data;
        let event = match action.kind.as_str() {
            "createCard" => Some((
                ActivityKind::Created,
                None,
                data.list.as_ref().map(|list| list.id.clone()),
            )),
            "updateCard" => match (&data.list_before, &data.list_after) {
                (Some(before), Some(after)) => Some((
                    ActivityKind::Moved,
                    Some(before.id.clone()),
                    Some(after.id.clone()),
                )),
                _ => None,
            },
            "addMemberToCard" => Some((ActivityKind::Assigned, None, None)),
            "addLabelToCard" => Some((ActivityKind::Labeled, None, None)),
            "commentCard" => {
                comments.push(Comment {
                    author_id: action.id_member_creator.clone().unwrap_or_default(),
                    created_at: action.date,
                    text: data.text.clone().unwrap_or_default(),
                });
                Some((ActivityKind::Commented, None, None))
            }
            _ => None,
        };

        if let Some((kind, from_list, to_list)) = event {
            activity.push(ActivityEvent {
                kind,
                at: action.date,
                from_list,
                to_list,
            });
        }
    }

    if !activity.iter().any(|e| e.kind == ActivityKind::Created) {
        activity.push(ActivityEvent {
            kind: ActivityKind::Created,
            at: created_at,
            from_list: None,
            to_list: None,
        });
    }
    activity.sort_by_key(|event| event.at);
    comments.sort_by_key(|comment| comment.created_at);

    let estimate = if estimate_field.is_empty() {
        None
    } else {
        card.custom_field_items
            .iter()
            .find(|item| item.id_custom_field == estimate_field)
            .and_then(|item| item.value.as_ref()?.number.as_deref()?.parse::<f64>().ok())
    };

    Ok(Card {
        labels: card.labels.iter().filter_map(label_name).collect(),
        label_colors: card.labels.iter().filter_map(label_color).collect(),
        assignees: card.id_members.into_iter().collect(),
        id: card.id,
        title: card.name,
        list_id: card.id_list,
        due: card.due,
        due_complete: card.due_complete,
        created_at,
        estimate,
        url: card.short_url,
        comments,
        activity,
    })
}

/// Trello ids start with a big-endian Unix timestamp in 8 hex digits.
fn created_at_from_id(id: &str) -> Result<DateTime<Utc>, BoardError> {
    id.get(..8)
        .and_then(|hex| i64::from_str_radix(hex, 16).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| BoardError::Malformed(format!("card id {id} carries no timestamp")))
}

/// Label name, or the capitalized color for unnamed labels.
fn label_name(label: &TrelloLabel) -> Option<String> {
    if let Some(name) = label.name.as_deref().filter(|n| !n.trim().is_empty()) {
        return Some(name.trim().to_string());
    }
    let color = label.color.as_deref().filter(|c| !c.is_empty())?;
    let mut chars = color.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
}

fn label_color(label: &TrelloLabel) -> Option<String> {
    label
        .color
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn creation_time_comes_from_object_id() {
        // 0x65f1a2b3 = 1710334643
        let at = created_at_from_id("65f1a2b3c4d5e6f7a8b9c0d1").unwrap();
        assert_eq!(at.timestamp(), 1_710_334_643);
        assert!(created_at_from_id("zz").is_err());
        assert!(created_at_from_id("not-a-hex-id").is_err());
    }

    #[test]
    fn unnamed_labels_use_capitalized_color() {
        let named = TrelloLabel {
            name: Some(" Blocked ".into()),
            color: Some("red".into()),
        };
        let unnamed = TrelloLabel {
            name: Some(String::new()),
            color: Some("red".into()),
        };
        let blank = TrelloLabel {
            name: None,
            color: None,
        };
        assert_eq!(label_name(&named).as_deref(), Some("Blocked"));
        assert_eq!(label_name(&unnamed).as_deref(), Some("Red"));
        assert_eq!(label_name(&blank), None);
    }

    #[test]
    fn label_colors_are_kept_even_for_named_labels() {
        let named = TrelloLabel {
            name: Some("Payments".into()),
            color: Some("Red".into()),
        };
        let colorless = TrelloLabel {
            name: Some("triage".into()),
            color: None,
        };
        assert_eq!(label_color(&named).as_deref(), Some("red"));
        assert_eq!(label_color(&colorless), None);
    }
}
