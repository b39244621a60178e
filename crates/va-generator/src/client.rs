//! HTTP client for an OpenAI-compatible chat-completions endpoint.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use va_core::{ApiKey, ArtifactKind, BackendError, ChatRequest, CompletionBackend};

use crate::config::GeneratorConfig;

/// Longest error body kept in a [`BackendError::Status`].
const ERROR_BODY_LEN_MAX: usize = 2_000;

/// Chat-completions client.
///
/// Non-2xx statuses are hard failures. There is no retry and no rate-limit
/// handling; timeouts are enforced by the pipeline per stage.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for ChatClient {
    async fn complete(
        &self,
        stage: ArtifactKind,
        request: &ChatRequest,
        api_key: &ApiKey,
    ) -> Result<Value, BackendError> {
        let response = self
            .http
            .post(self.endpoint())
            .header(AUTHORIZATION, api_key.bearer())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        debug!(%stage, status = status.as_u16(), bytes = text.len(), "completion response");

        if !status.is_success() {
            let mut body = text;
            if body.len() > ERROR_BODY_LEN_MAX {
                let cut = (0..=ERROR_BODY_LEN_MAX)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }
}
