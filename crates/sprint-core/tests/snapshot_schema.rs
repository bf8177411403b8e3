//! The generated snapshot schema accepts the sample board and rejects broken input.

use pretty_assertions::assert_eq;
use schemars::schema_for;
use sprint_core::board::BoardSnapshot;
use sprint_core::enums::ActivityKind;

const SAMPLE: &str = include_str!("fixtures/sprint_board.json");

fn schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(BoardSnapshot)).expect("schema serializes")
}

fn validation_errors(instance: &serde_json::Value) -> Vec<String> {
    let schema = schema();
    let validator = jsonschema::validator_for(&schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

#[test]
fn sample_board_matches_schema() {
    let instance: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    let errors = validation_errors(&instance);
    assert!(errors.is_empty(), "schema errors: {errors:?}");
}

#[test]
fn sample_board_deserializes() {
    let snapshot: BoardSnapshot = serde_json::from_str(SAMPLE).unwrap();
    assert_eq!(snapshot.lists.len(), 4);
    assert_eq!(snapshot.cards.len(), 5);
    assert_eq!(snapshot.initial_list().map(|l| l.name.as_str()), Some("To Do"));

    let refunds = snapshot.card("c-refunds").unwrap();
    assert!(refunds.assignees.is_empty());
    assert!(refunds.has_label("Blocked"));
    assert_eq!(refunds.activity[1].kind, ActivityKind::Moved);
}

#[test]
fn missing_cards_field_is_rejected() {
    let mut instance: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    instance.as_object_mut().unwrap().remove("cards");
    assert!(!validation_errors(&instance).is_empty());
}

#[test]
fn unknown_activity_kind_is_rejected() {
    let mut instance: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    instance["cards"][0]["activity"][0]["kind"] = serde_json::json!("archived");
    assert!(!validation_errors(&instance).is_empty());
}
