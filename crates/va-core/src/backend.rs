//! Completion backend seam.
//!
//! The pipeline talks to a [`CompletionBackend`]; the HTTP client and the
//! simulated backend used in tests both implement it.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::artifact::ArtifactKind;
use crate::error::{AppError, BackendError};
use crate::wire::ChatRequest;

/// Bearer credential supplied by the user.
///
/// Never validated locally beyond being non-blank; only forwarded.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting blank input.
    pub fn new(key: impl Into<String>) -> Result<Self, AppError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(AppError::CredentialMissing);
        }
        Ok(Self(key))
    }

    /// Read the key from an environment variable.
    pub fn from_env(var: &str) -> Result<Self, AppError> {
        std::env::var(var)
            .map_err(|_| AppError::CredentialMissing)
            .and_then(Self::new)
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Something that can answer a chat-completion request.
///
/// Returns the raw response body; extracting the text is the caller's job so
/// that a malformed payload is reported against the stage that asked.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        stage: ArtifactKind,
        request: &ChatRequest,
        api_key: &ApiKey,
    ) -> Result<Value, BackendError>;
}
