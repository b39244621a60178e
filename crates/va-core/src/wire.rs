//! Chat-completions wire format.
//!
//! Requests serialize to the OpenAI-compatible body the endpoint expects.
//! Responses stay as raw JSON until [`extract_content`] pulls the text out of
//! `choices[0].message.content`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// A request with a single user message holding the whole prompt.
    pub fn single_prompt(
        model: impl Into<String>,
        prompt: impl Into<String>,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            temperature,
            max_tokens,
        }
    }

    /// Concatenated message contents, for inspection in tests and logs.
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Read `choices[0].message.content` from a response body.
///
/// On failure returns a short description of where the path broke.
pub fn extract_content(body: &Value) -> Result<String, String> {
    let choices = body
        .get("choices")
        .ok_or_else(|| "missing `choices`".to_string())?
        .as_array()
        .ok_or_else(|| "`choices` is not an array".to_string())?;
    let first = choices
        .first()
        .ok_or_else(|| "`choices` is empty".to_string())?;
    let message = first
        .get("message")
        .ok_or_else(|| "missing `choices[0].message`".to_string())?;
    let content = message
        .get("content")
        .ok_or_else(|| "missing `choices[0].message.content`".to_string())?;

    content
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| "`choices[0].message.content` is not a string".to_string())
}
