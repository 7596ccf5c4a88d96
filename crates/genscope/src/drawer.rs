//! Detail drawer showing one generation in full.

use crate::generation::{ChatMessage, Generation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Everything the drawer shows about a generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationDetail {
    pub id: String,
    pub model: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub duration_ms: Option<i64>,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub tags: Vec<String>,
    pub user: Option<String>,
    /// Whole chat history
    pub messages: Vec<ChatMessage>,
    pub response: Option<String>,
    pub error: Option<String>,
}

impl From<&Generation> for GenerationDetail {
    fn from(g: &Generation) -> Self {
        Self {
            id: g.id.clone(),
            model: g.name.clone(),
            status: g.status.clone(),
            created_at: g.created_at,
            duration_ms: g.duration_ms(),
            prompt_tokens: g.prompt_tokens,
            completion_tokens: g.completion_tokens,
            total_tokens: g.total_tokens(),
            tags: g.tags.clone(),
            user: g.user.clone(),
            messages: g.messages().to_vec(),
            response: g.output.as_ref().map(|o| o.text.clone()),
            error: g.error.as_ref().map(|e| e.message.clone()),
        }
    }
}

impl GenerationDetail {
    /// Multi-line text rendering.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Generation {}", self.id);
        let _ = writeln!(out, "  model:   {}", self.model);
        let _ = writeln!(out, "  status:  {}", self.status);
        let _ = writeln!(out, "  created: {}", self.created_at.to_rfc3339());
        if let Some(ms) = self.duration_ms {
            let _ = writeln!(out, "  duration: {:.2}s", ms as f64 / 1000.0);
        }
        let _ = writeln!(
            out,
            "  tokens:  {} ({} prompt + {} completion)",
            self.total_tokens,
            self.prompt_tokens,
            self.completion_tokens
        );
        if !self.tags.is_empty() {
            let _ = writeln!(out, "  tags:    {}", self.tags.join(", "));
        }
        if let Some(user) = &self.user {
            let _ = writeln!(out, "  user:    {user}");
        }
        let _ = writeln!(out, "Chat history ({} messages)", self.messages.len());
        for message in &self.messages {
            let role = message.role.as_deref().unwrap_or("?");
            let _ = writeln!(out, "  [{role}] {}", message.text);
        }
        if let Some(response) = &self.response {
            let _ = writeln!(out, "Response\n  {response}");
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "Error\n  {error}");
        }
        out
    }
}

/// Side drawer opened by clicking a row.
#[derive(Debug, Clone, Default)]
pub struct DetailDrawer {
    current: Option<GenerationDetail>,
}

impl DetailDrawer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `generation`, replacing whatever was open.
    pub fn open(&mut self, generation: &Generation) {
        self.current = Some(GenerationDetail::from(generation));
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&GenerationDetail> {
        self.current.as_ref()
    }
}
