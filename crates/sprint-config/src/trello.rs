//! Trello board access configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://api.trello.com/1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrelloConfig {
    /// Trello API key.
    #[serde(default)]
    pub api_key: String,

    /// Trello API token issued for the key.
    #[serde(default)]
    pub api_token: String,

    /// Board analyzed when `--board` is not given.
    #[serde(default)]
    pub board_id: String,

    /// REST API root. Overridable for proxies and tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Custom field id holding a numeric effort estimate. Empty disables estimates.
    #[serde(default)]
    pub estimate_field: String,
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_token: String::new(),
            board_id: String::new(),
            base_url: default_base_url(),
            estimate_field: String::new(),
        }
    }
}

impl TrelloConfig {
    /// Check if credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = TrelloConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.base_url, "https://api.trello.com/1");
    }

    #[test]
    fn key_and_token_configure_access() {
        let config = TrelloConfig {
            api_key: "key".into(),
            api_token: "token".into(),
            ..TrelloConfig::default()
        };
        assert!(config.is_configured());
    }
}
