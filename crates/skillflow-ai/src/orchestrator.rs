//! Request orchestration: primer injection, timeout, reply normalization.
//!
//! `Orchestrator::send` appends the user turn to the session, calls the
//! provider with the whole history under a hard timeout, and on success
//! appends the cleaned reply. There are no retries; on error the user turn
//! stays in history and the caller decides whether to resend.

use std::sync::Arc;
use std::time::Duration;

use skillflow_common::new_correlation_id;
use tracing::{debug, info_span, warn, Instrument};

use crate::cleanup::clean_markup;
use crate::session::ConversationSession;
use crate::{AiClient, AiError, Message};

/// Reply used when the provider answers without any text.
pub const FALLBACK_REPLY: &str = "Sorry, I could not generate a response. Please try again.";

/// Default request cap.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_CONTEXT_PLACEHOLDER: &str = "{user_context}";

const DEFAULT_PERSONA: &str = "You are SkillFlow AI, an intelligent learning assistant integrated within the SkillFlow educational platform. {user_context}

Your role is to:
- Provide clear, concise, and helpful educational responses
- Format your responses in plain, natural language (NO markdown formatting)
- Adapt your teaching style to the user's learning needs
- Be encouraging and supportive
- Answer questions on various topics including academics, study techniques, and learning strategies
- Provide practical, actionable advice
- Keep responses conversational and easy to read
- Use simple bullet points with \"•\" instead of numbered lists or markdown
- Avoid technical jargon unless necessary, and explain terms when used

Important: Format all responses as clean, readable plain text. Do NOT use markdown, asterisks, or special formatting.";

const DEFAULT_ACKNOWLEDGMENT: &str = "I understand. I am SkillFlow AI, your learning assistant. I will provide clear, helpful responses in plain text format. How can I help you today?";

/// The two synthetic turns that open every conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primer {
    /// Persona prompt; `{user_context}` is replaced by the user line.
    pub persona: String,
    pub acknowledgment: String,
}

impl Default for Primer {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            acknowledgment: DEFAULT_ACKNOWLEDGMENT.to_string(),
        }
    }
}

impl Primer {
    /// Render both turns for the given session.
    pub fn turns(&self, session: &ConversationSession) -> [Message; 2] {
        let context = session
            .user_context()
            .map(|c| c.describe())
            .unwrap_or_default();
        let persona = self.persona.replace(USER_CONTEXT_PLACEHOLDER, &context);
        [
            Message::user(persona),
            Message::assistant(self.acknowledgment.clone()),
        ]
    }
}

/// Drives one provider call per user utterance.
pub struct Orchestrator {
    client: Arc<dyn AiClient>,
    primer: Primer,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self {
            client,
            primer: Primer::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_primer(mut self, primer: Primer) -> Self {
        self.primer = primer;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn primer(&self) -> &Primer {
        &self.primer
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one user message and return the cleaned assistant reply.
    pub async fn send(
        &self,
        session: &mut ConversationSession,
        user_message: &str,
    ) -> Result<String, AiError> {
        if user_message.trim().is_empty() {
            return Err(AiError::EmptyInput);
        }

        if session.is_empty() {
            for turn in self.primer.turns(session) {
                session.push(turn);
            }
        }
        session.push(Message::user(user_message));

        let span = info_span!("assistant_request", cid = %new_correlation_id());
        let call = tokio::time::timeout(self.timeout, self.client.send_message(session.turns()));

        let response = match call.instrument(span.clone()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                span.in_scope(|| warn!(error = %e, "assistant request failed"));
                return Err(e);
            }
            Err(_) => {
                let secs = self.timeout.as_secs();
                span.in_scope(|| warn!(timeout_secs = secs, "assistant request timed out"));
                return Err(AiError::Timeout(secs));
            }
        };

        span.in_scope(|| {
            debug!(
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "assistant replied"
            )
        });

        let raw = if response.content.trim().is_empty() {
            FALLBACK_REPLY
        } else {
            response.content.as_str()
        };
        let reply = clean_markup(raw);
        session.push(Message::assistant(reply.clone()));
        Ok(reply)
    }

    /// Reset `session` to continue a stored conversation: primer first, then
    /// the stored turns. An empty `prior` leaves the session empty.
    pub fn resume(&self, session: &mut ConversationSession, prior: Vec<Message>) {
        session.clear_history();
        if prior.is_empty() {
            return;
        }
        for turn in self.primer.turns(session) {
            session.push(turn);
        }
        for turn in prior {
            session.push(turn);
        }
    }
}
