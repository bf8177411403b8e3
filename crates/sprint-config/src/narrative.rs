//! Narrative renderer (chat completion endpoint) configuration.

use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_temperature() -> f32 {
    0.2
}

const fn default_max_tokens() -> u32 {
    600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NarrativeConfig {
    /// Whether narrative sections call the model at all.
    #[serde(default)]
    pub enabled: bool,

    /// OpenAI-compatible chat completions URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl NarrativeConfig {
    /// Enabled and has an API key.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let config = NarrativeConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.max_tokens, 600);
    }

    #[test]
    fn enabled_without_key_is_not_configured() {
        let config = NarrativeConfig {
            enabled: true,
            ..NarrativeConfig::default()
        };
        assert!(!config.is_configured());
    }
}
