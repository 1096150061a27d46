//! Persisted chat shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillflow_common::ConversationId;

/// Title used for stored conversations that have none.
pub const UNTITLED_CHAT: &str = "Untitled Chat";

/// Author of a stored message. Stored as `user` / `ai`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Assistant,
}

/// One message as shown to and persisted for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// What the persistence bridge writes after each mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRecord {
    pub id: ConversationId,
    pub title: String,
    pub messages: Vec<StoredMessage>,
}

impl ConversationRecord {
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Entry of the history index.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub message_count: usize,
    pub last_updated: DateTime<Utc>,
    pub archived: bool,
}

/// Fields of a chat document as read back from the store.
#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ChatDocument {
    pub title: Option<String>,
    pub message_count: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub archived: bool,
    pub messages: Vec<StoredMessage>,
}

impl ChatDocument {
    pub(crate) fn summary(&self, id: ConversationId) -> ConversationSummary {
        ConversationSummary {
            id,
            title: self
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_CHAT.to_string()),
            message_count: self.message_count.unwrap_or(0) as usize,
            // A write that has not been stamped yet counts as "now".
            last_updated: self.timestamp.unwrap_or_else(Utc::now),
            archived: self.archived,
        }
    }
}
