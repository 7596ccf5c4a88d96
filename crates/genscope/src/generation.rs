//! Generation records: one LLM run as delivered by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message exchanged with the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            text: text.into(),
        }
    }
}

/// Prompt input: a single message or a chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageInput {
    Many(Vec<ChatMessage>),
    One(ChatMessage),
}

impl MessageInput {
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        match self {
            Self::Many(messages) => messages,
            Self::One(message) => std::slice::from_ref(message),
        }
    }
}

/// Error reported by a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// One LLM run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// Model name
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub input: Option<MessageInput>,
    #[serde(default)]
    pub output: Option<ChatMessage>,
    #[serde(default)]
    pub error: Option<RunError>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub user: Option<String>,
}

impl Generation {
    /// Status value of a successful run.
    pub const SUCCESS: &'static str = "success";

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }

    /// Wall time of the run, if it has ended.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        self.ended_at
            .map(|ended| (ended - self.created_at).num_milliseconds())
    }

    /// Prompt plus completion tokens, saturating at `u64::MAX`.
    #[must_use]
    pub const fn total_tokens(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }

    /// Prompt messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        match &self.input {
            Some(input) => input.messages(),
            None => &[],
        }
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages().last()
    }

    /// Output text, or the error message when there is no output.
    #[must_use]
    pub fn response_text(&self) -> Option<&str> {
        match (&self.output, &self.error) {
            (Some(output), _) => Some(output.text.as_str()),
            (None, Some(error)) => Some(error.message.as_str()),
            (None, None) => None,
        }
    }

    /// Parse a JSON array of generations.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
