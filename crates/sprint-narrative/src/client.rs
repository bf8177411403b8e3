//! OpenAI-compatible chat completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sprint_config::{HttpConfig, NarrativeConfig};
use sprint_core::finding::Finding;
use sprint_core::retry::RetryPolicy;
use sprint_report::{NarrativeRenderer, RenderError, StyleHints};

use crate::error::NarrativeError;
use crate::prompt::{ChatMessage, build_messages};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Narrative renderer backed by a chat completions endpoint.
pub struct ChatRenderer {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl ChatRenderer {
    /// Build a renderer from the `[narrative]` and `[http]` config sections.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::NotConfigured`] unless narration is enabled
    /// and an API key is set.
    pub fn new(narrative: &NarrativeConfig, http: &HttpConfig) -> Result<Self, NarrativeError> {
        if !narrative.is_configured() {
            return Err(NarrativeError::NotConfigured(
                "set narrative.enabled = true and narrative.api_key".to_string(),
            ));
        }

        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("sprint-health/", env!("CARGO_PKG_VERSION")))
                .timeout(http.timeout())
                .build()?,
            endpoint: narrative.endpoint.clone(),
            model: narrative.model.clone(),
            api_key: narrative.api_key.clone(),
            temperature: narrative.temperature,
            max_tokens: narrative.max_tokens,
            retry: http.retry_policy(),
        })
    }

    /// Send `messages` and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns the last [`NarrativeError`] once retries are exhausted, or
    /// [`NarrativeError::EmptyResponse`] when the model answers with nothing.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, NarrativeError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let request = &request;
        let http = &self.http;
        let endpoint = self.endpoint.as_str();
        let api_key = self.api_key.as_str();

        let body = self
            .retry
            .run_with_retry_after(
                "chat completion",
                NarrativeError::is_retryable,
                NarrativeError::retry_after,
                || async move {
                    let resp = http
                        .post(endpoint)
                        .bearer_auth(api_key)
                        .json(request)
                        .send()
                        .await?;
                    let resp = check_response(resp).await?;
                    Ok::<String, NarrativeError>(resp.text().await?)
                },
            )
            .await?;

        parse_completion(&body)
    }
}

#[async_trait]
impl NarrativeRenderer for ChatRenderer {
    async fn summarize(
        &self,
        findings: &[Finding],
        hints: &StyleHints,
    ) -> Result<String, RenderError> {
        tracing::info!(
            model = %self.model,
            findings = findings.len(),
            section = %hints.section_title,
            "requesting narrative"
        );
        let messages = build_messages(findings, hints);
        Ok(self.complete(&messages).await?)
    }
}

async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, NarrativeError> {
    let status = resp.status();
    if status == 429 {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(NarrativeError::RateLimited { retry_after_secs });
    }
    if !status.is_success() {
        return Err(NarrativeError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn parse_completion(body: &str) -> Result<String, NarrativeError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| NarrativeError::Parse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(NarrativeError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn enabled() -> NarrativeConfig {
        NarrativeConfig {
            enabled: true,
            api_key: "sk-test".into(),
            ..NarrativeConfig::default()
        }
    }

    #[test]
    fn disabled_or_keyless_config_is_rejected() {
        let http = HttpConfig::default();
        assert!(matches!(
            ChatRenderer::new(&NarrativeConfig::default(), &http),
            Err(NarrativeError::NotConfigured(_))
        ));

        let keyless = NarrativeConfig {
            api_key: String::new(),
            ..enabled()
        };
        assert!(ChatRenderer::new(&keyless, &http).is_err());
        assert!(ChatRenderer::new(&enabled(), &http).is_ok());
    }

    #[test]
    fn parses_first_choice_text() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Sprint is on track.  "}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Sprint is on track.");
    }

    #[test]
    fn empty_or_missing_content_is_an_empty_response() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            assert!(matches!(
                parse_completion(body),
                Err(NarrativeError::EmptyResponse)
            ));
        }
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            parse_completion("<html>"),
            Err(NarrativeError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn server_errors_are_retryable_and_client_errors_are_not() {
        let response = |status: u16| {
            reqwest::Response::from(
                ::http::Response::builder()
                    .status(status)
                    .body("oops")
                    .unwrap(),
            )
        };

        let server = check_response(response(502)).await.unwrap_err();
        assert!(server.is_retryable());

        let client = check_response(response(400)).await.unwrap_err();
        assert!(!client.is_retryable());
        assert_eq!(client.to_string(), "API error (400): oops");

        let limited = check_response(response(429)).await.unwrap_err();
        assert!(matches!(
            limited,
            NarrativeError::RateLimited {
                retry_after_secs: 60
            }
        ));
    }

    #[test]
    fn failures_map_to_render_errors() {
        let limited = NarrativeError::RateLimited {
            retry_after_secs: 1,
        };
        let unavailable: RenderError = limited.into();
        assert!(matches!(unavailable, RenderError::Unavailable(_)));

        let empty: RenderError = NarrativeError::EmptyResponse.into();
        assert!(matches!(empty, RenderError::EmptyResponse));
    }
}
