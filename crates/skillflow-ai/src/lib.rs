//! AI engine for SkillFlow.
//!
//! Provides the Gemini `generateContent` client and the request orchestrator
//! that drives a `ConversationSession`:
//! - Two-turn primer injected before the first real user turn
//! - Hard request timeout with distinct error classes
//! - Markup cleanup so replies render as plain text

pub mod cleanup;
pub mod gemini;
pub mod orchestrator;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use async_trait::async_trait;

pub use cleanup::clean_markup;
pub use gemini::{GeminiClient, GeminiConfig};
pub use orchestrator::{Orchestrator, Primer, FALLBACK_REPLY};
pub use session::ConversationSession;

/// A stateless generative-language backend: full history in, one reply out.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Default)]
pub struct AiResponse {
    /// Text of the first candidate's first part; empty when the provider
    /// returned no text.
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AiError {
    #[error("message is empty")]
    EmptyInput,
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("rate limited")]
    RateLimited,
    #[error("unauthorized")]
    Unauthorized,
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

impl AiError {
    /// Text shown to the user in place of the assistant's reply.
    pub fn user_message(&self) -> String {
        match self {
            AiError::EmptyInput => "Please type a message first.".into(),
            AiError::Network(_) => "Network error. Please check your internet connection.".into(),
            AiError::Timeout(_) => "Request timeout. Please try again.".into(),
            AiError::RateLimited => "Too many requests. Please try again later.".into(),
            AiError::Unauthorized => {
                "API key is invalid. Please check your configuration.".into()
            }
            AiError::Api { message, .. } => message.clone(),
            AiError::Parse(_) => "Could not read the assistant response.".into(),
        }
    }
}

impl From<AiError> for skillflow_common::SkillflowError {
    fn from(err: AiError) -> Self {
        skillflow_common::SkillflowError::Ai(err.to_string())
    }
}
