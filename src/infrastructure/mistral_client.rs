//! Mistral chat completions client used as the scoring oracle

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::errors::{RecallError, RecallResult};
use crate::domain::services::ScoringOracle;
use crate::infrastructure::config::ScoringConfig;

pub struct MistralClient {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

impl MistralClient {
    pub fn new(api_key: impl Into<String>, config: &ScoringConfig) -> RecallResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RecallError::config("scoring.api_key", "Mistral API key is empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| RecallError::config("scoring", format!("Failed to build Mistral HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base)
    }

    fn headers(&self) -> RecallResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| RecallError::scoring("invalid Mistral API key"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl ScoringOracle for MistralClient {
    async fn complete(&self, system: &str, user: &str) -> RecallResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let resp = self
            .client
            .post(self.endpoint())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecallError::scoring(format!("failed to call Mistral chat completions: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            warn!("Mistral returned {}", status);
            return Err(RecallError::scoring(format!("Mistral returned {status}: {text}")));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| RecallError::scoring(format!("failed to parse Mistral response: {e}")))?;

        let answer = parsed.first_content().ok_or_else(|| RecallError::scoring("Mistral response had no choices"))?;
        debug!("Mistral answered {:?}", answer);
        Ok(answer)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

impl ChatResponse {
    fn first_content(self) -> Option<String> {
        self.choices.into_iter().next().map(|choice| choice.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let body = ChatRequest {
            model: "mistral-large-latest",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "expert",
                },
                ChatMessage {
                    role: "user",
                    content: "Jambon. Risks: Listeria",
                },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "mistral-large-latest");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Jambon. Risks: Listeria");
    }

    #[test]
    fn first_choice_content_is_the_answer() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":" 42 "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_content().as_deref(), Some(" 42 "));
    }

    #[test]
    fn empty_choices_yield_nothing() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(parsed.first_content().is_none());
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let result = MistralClient::new("  ", &ScoringConfig::default());
        assert!(matches!(result, Err(RecallError::Config { .. })));
    }

    #[test]
    fn endpoint_is_built_from_api_base() {
        let config = ScoringConfig {
            api_base: "https://api.mistral.ai/".into(),
            ..ScoringConfig::default()
        };
        let client = MistralClient::new("key", &config).unwrap();
        assert_eq!(client.endpoint(), "https://api.mistral.ai/v1/chat/completions");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_scoring_error() {
        let config = ScoringConfig {
            api_base: "http://127.0.0.1:9".into(),
            request_timeout_seconds: 2,
            ..ScoringConfig::default()
        };
        let client = MistralClient::new("key", &config).unwrap();
        let err = client.complete("system", "user").await.unwrap_err();
        assert!(matches!(err, RecallError::Scoring { .. }));
    }
}
