//! Trello REST response shapes, limited to the fields the snapshot needs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloBoard {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloMember {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloLabel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloCustomFieldItem {
    pub id_custom_field: String,
    #[serde(default)]
    pub value: Option<TrelloCustomFieldValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloCustomFieldValue {
    /// Trello sends numbers as strings.
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloCard {
    pub id: String,
    pub name: String,
    pub id_list: String,
    #[serde(default)]
    pub id_members: Vec<String>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_complete: bool,
    #[serde(default)]
    pub labels: Vec<TrelloLabel>,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub custom_field_items: Vec<TrelloCustomFieldItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub id_member_creator: Option<String>,
    #[serde(default)]
    pub data: TrelloActionData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloActionData {
    #[serde(default)]
    pub card: Option<TrelloRef>,
    #[serde(default)]
    pub list: Option<TrelloRef>,
    #[serde(default)]
    pub list_before: Option<TrelloRef>,
    #[serde(default)]
    pub list_after: Option<TrelloRef>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloRef {
    pub id: String,
}

/// Everything fetched for one board, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBoard {
    pub board: TrelloBoard,
    pub lists: Vec<TrelloList>,
    pub members: Vec<TrelloMember>,
    pub cards: Vec<TrelloCard>,
    #[serde(default)]
    pub actions: Vec<TrelloAction>,
}
