//! Chat-session client for SkillFlow.
//!
//! `ChatController` ties together the active conversation's message list,
//! the history index of past conversations, the assistant orchestrator and
//! the persistence bridge that mirrors every change to the chat store.

pub mod bridge;
pub mod controller;
pub mod history;

pub use bridge::PersistenceBridge;
pub use controller::{conversation_title, ChatController, ERROR_REPLY_PREFIX, TITLE_MAX_CHARS};
pub use history::HistoryIndex;

use skillflow_ai::AiError;
use skillflow_store::StoreError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl ChatError {
    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Ai(e) => e.user_message(),
            ChatError::Persistence(e) => format!("Could not save your chat: {e}"),
        }
    }
}

impl From<ChatError> for skillflow_common::SkillflowError {
    fn from(err: ChatError) -> Self {
        skillflow_common::SkillflowError::Chat(err.to_string())
    }
}
