//! Trello REST client.

use chrono::Utc;
use serde::de::DeserializeOwned;
use sprint_config::{HttpConfig, TrelloConfig};
use sprint_core::board::BoardSnapshot;
use sprint_core::retry::RetryPolicy;

use crate::error::BoardError;
use crate::http::check_response;
use crate::normalize::normalize;
use crate::wire::{RawBoard, TrelloAction, TrelloBoard, TrelloCard, TrelloList, TrelloMember};

/// Card actions that feed the activity history.
const ACTION_FILTER: &str =
    "createCard,updateCard:idList,addMemberToCard,commentCard,addLabelToCard";

/// Trello caps one page of actions at 1000.
const ACTION_LIMIT: u32 = 1000;

pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_token: String,
    estimate_field: String,
    retry: RetryPolicy,
}

impl TrelloClient {
    /// Build a client from the `[trello]` and `[http]` config sections.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotConfigured`] when the key or token is missing,
    /// or [`BoardError::Http`] if the HTTP client cannot be built.
    pub fn new(trello: &TrelloConfig, http: &HttpConfig) -> Result<Self, BoardError> {
        if !trello.is_configured() {
            return Err(BoardError::NotConfigured(
                "set trello.api_key and trello.api_token (or SPRINT_TRELLO__API_KEY / SPRINT_TRELLO__API_TOKEN)"
                    .to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("sprint-health/", env!("CARGO_PKG_VERSION")))
                .timeout(http.timeout())
                .build()?,
            base_url: trello.base_url.trim_end_matches('/').to_string(),
            api_key: trello.api_key.clone(),
            api_token: trello.api_token.clone(),
            estimate_field: trello.estimate_field.clone(),
            retry: http.retry_policy(),
        })
    }

    /// Fetch the board and normalize it into a snapshot captured now.
    ///
    /// Each request is retried per the configured policy while the error is
    /// transient (see [`BoardError::is_retryable`]).
    ///
    /// # Errors
    ///
    /// Returns the last [`BoardError`] for a failed request, or
    /// [`BoardError::Malformed`] when the response shape is unexpected.
    pub async fn fetch_snapshot(&self, board_id: &str) -> Result<BoardSnapshot, BoardError> {
        let board_path = format!("boards/{}", urlencoding::encode(board_id));
        let lists_path = format!("{board_path}/lists");
        let members_path = format!("{board_path}/members");
        let cards_path = format!("{board_path}/cards");
        let actions_path = format!("{board_path}/actions");
        let action_limit = ACTION_LIMIT.to_string();

        let board_query = [("fields", "name")];
        let lists_query = [("filter", "all"), ("fields", "name,pos,closed")];
        let members_query = [("fields", "fullName,username")];
        let cards_query = [
            ("fields", "name,idList,idMembers,due,dueComplete,labels,shortUrl"),
            ("customFieldItems", "true"),
        ];
        let actions_query = [("filter", ACTION_FILTER), ("limit", action_limit.as_str())];
        tracing::info!(board = board_id, "fetching board from Trello");

        let (board, lists, members, cards, actions) = tokio::try_join!(
            self.get::<TrelloBoard>(&board_path, &board_query),
            self.get::<Vec<TrelloList>>(&lists_path, &lists_query),
            self.get::<Vec<TrelloMember>>(&members_path, &members_query),
            self.get::<Vec<TrelloCard>>(&cards_path, &cards_query),
            self.get::<Vec<TrelloAction>>(&actions_path, &actions_query),
        )?;

        if actions.len() >= ACTION_LIMIT as usize {
            tracing::warn!(
                board = board_id,
                limit = ACTION_LIMIT,
                "action history truncated; older moves and comments are missing"
            );
        }

        tracing::debug!(
            lists = lists.len(),
            members = members.len(),
            cards = cards.len(),
            actions = actions.len(),
            "fetched board data"
        );

        normalize(
            RawBoard {
                board,
                lists,
                members,
                cards,
                actions,
            },
            &self.estimate_field,
            Utc::now(),
        )
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BoardError> {
        let url = self.url(path, query);
        let url = url.as_str();
        let http = &self.http;

        self.retry
            .run_with_retry_after(
                path,
                BoardError::is_retryable,
                BoardError::retry_after,
                || async move {
                    let resp = check_response(http.get(url).send().await?).await?;
                    let body = resp.text().await?;
                    Ok::<T, BoardError>(serde_json::from_str(&body)?)
                },
            )
            .await
    }

    /// Absolute URL for `path` with credentials and `query` encoded.
    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/{path}?key={}&token={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.api_token)
        );
        for (name, value) in query {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}
