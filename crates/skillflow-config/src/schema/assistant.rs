//! Generative-language API settings.

use serde::{Deserialize, Serialize};
use skillflow_common::ConfigError;

/// Assistant (Gemini) configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// API key; prefer `SKILLFLOW_GEMINI_API_KEY` over writing it here.
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    /// Valid range: 1-100.
    pub top_k: u32,
    /// Valid range: 0.0-1.0.
    pub top_p: f64,
    /// Valid range: 1-8192.
    pub max_output_tokens: u32,
    /// Hard cap on one request, in seconds (valid range: 1-300).
    pub timeout_secs: u64,
    /// Persona prompt override. `{user_context}` is replaced with the user line.
    pub persona: Option<String>,
    /// Acknowledgment turn override.
    pub acknowledgment: Option<String>,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("top_k", &self.top_k)
            .field("top_p", &self.top_p)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("persona", &self.persona.is_some())
            .field("acknowledgment", &self.acknowledgment.is_some())
            .finish()
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".into(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
            timeout_secs: 30,
            persona: None,
            acknowledgment: None,
        }
    }
}

impl AssistantConfig {
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(
                "assistant.api_key (or SKILLFLOW_GEMINI_API_KEY)".into(),
            ));
        }
        Ok(&self.api_key)
    }
}
