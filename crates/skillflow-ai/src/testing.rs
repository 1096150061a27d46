//! Scripted `AiClient` for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{AiClient, AiError, AiResponse, Message};

/// Replays queued responses in order and records every request it sees.
/// An exhausted queue answers with `AiError::Network`.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<AiResponse, AiError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, response: Result<AiResponse, AiError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn push_reply(&self, text: &str) {
        self.push(Ok(AiResponse {
            content: text.to_string(),
            ..Default::default()
        }));
    }

    /// Every history sent so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(&self, messages: &[Message]) -> Result<AiResponse, AiError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Network("no scripted response".into())))
    }
}
