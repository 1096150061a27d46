//! The active conversation and everything that reacts to it changing.

use chrono::Utc;
use skillflow_ai::{AiError, ConversationSession, Message, Orchestrator};
use skillflow_common::{next_id, ConversationId, UserContext};
use skillflow_store::{
    ChatRole, ConversationRecord, ConversationSummary, StoredMessage, UNTITLED_CHAT,
};
use tracing::{debug, info, warn};

use crate::bridge::PersistenceBridge;
use crate::history::HistoryIndex;
use crate::ChatError;

#[cfg(test)]
mod tests;

/// Titles are the first this-many characters of the first message.
pub const TITLE_MAX_CHARS: usize = 40;

/// Prefix of the synthetic assistant message shown when a request fails.
pub const ERROR_REPLY_PREFIX: &str = "Sorry, I encountered an error: ";

/// Title of a conversation with the given messages.
pub fn conversation_title(messages: &[StoredMessage]) -> String {
    messages
        .first()
        .map(|m| m.content.chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_else(|| UNTITLED_CHAT.to_string())
}

pub struct ChatController {
    orchestrator: Orchestrator,
    session: ConversationSession,
    bridge: PersistenceBridge,
    history: HistoryIndex,
    conversation_id: ConversationId,
    messages: Vec<StoredMessage>,
}

impl ChatController {
    pub fn new(orchestrator: Orchestrator, bridge: PersistenceBridge) -> Self {
        Self {
            orchestrator,
            session: ConversationSession::new(),
            bridge,
            history: HistoryIndex::new(),
            conversation_id: ConversationId::new(),
            messages: Vec::new(),
        }
    }

    /// Personalise the primer with the signed-in user's name and role.
    pub fn with_user_context(mut self, context: UserContext) -> Self {
        self.session.set_user_context(context);
        self
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    /// Messages of the active conversation, oldest first.
    pub fn messages(&self) -> &[StoredMessage] {
        &self.messages
    }

    pub fn history(&self) -> &HistoryIndex {
        &self.history
    }

    /// Turn history the next request will build on.
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    pub async fn append_user_message(&mut self, text: &str) -> Result<(), ChatError> {
        self.append(ChatRole::User, text).await
    }

    pub async fn append_assistant_message(&mut self, text: &str) -> Result<(), ChatError> {
        self.append(ChatRole::Assistant, text).await
    }

    async fn append(&mut self, role: ChatRole, text: &str) -> Result<(), ChatError> {
        self.messages.push(StoredMessage {
            id: next_id(),
            role,
            content: text.to_string(),
            timestamp: Utc::now(),
        });
        self.record_change().await
    }

    /// Refresh the history entry and mirror the conversation to the store.
    async fn record_change(&mut self) -> Result<(), ChatError> {
        let title = conversation_title(&self.messages);
        self.history.upsert(ConversationSummary {
            id: self.conversation_id.clone(),
            title: title.clone(),
            message_count: self.messages.len(),
            last_updated: Utc::now(),
            archived: false,
        });
        self.bridge
            .persist(ConversationRecord {
                id: self.conversation_id.clone(),
                title,
                messages: self.messages.clone(),
            })
            .await?;
        Ok(())
    }

    /// Send one user message and record the reply.
    ///
    /// On a failed request an explanatory assistant message is appended in
    /// place of the reply and the error is returned as well.
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        if text.trim().is_empty() {
            return Err(AiError::EmptyInput.into());
        }

        self.append_user_message(text).await?;

        match self.orchestrator.send(&mut self.session, text).await {
            Ok(reply) => {
                self.append_assistant_message(&reply).await?;
                Ok(reply)
            }
            Err(e) => {
                let notice = format!("{ERROR_REPLY_PREFIX}{}", e.user_message());
                self.append_assistant_message(&notice).await?;
                Err(e.into())
            }
        }
    }

    /// Leave the active conversation and start an empty one.
    pub fn start_new_conversation(&mut self) {
        self.messages.clear();
        self.session.clear_history();
        self.conversation_id = ConversationId::new();
        info!(conversation = %self.conversation_id, "started new conversation");
    }

    /// Same as [`start_new_conversation`](Self::start_new_conversation).
    pub fn clear_chat(&mut self) {
        self.start_new_conversation();
    }

    /// Make `id` the active conversation, loading its stored messages.
    ///
    /// An id with no stored conversation yields an empty message list.
    pub async fn switch_conversation(&mut self, id: ConversationId) -> Result<(), ChatError> {
        let messages = match self.bridge.load_messages(&id).await? {
            Some(messages) => messages,
            None => {
                debug!(conversation = %id, "no stored conversation");
                Vec::new()
            }
        };

        let prior: Vec<Message> = messages
            .iter()
            .map(|m| match m.role {
                ChatRole::User => Message::user(m.content.clone()),
                ChatRole::Assistant => Message::assistant(m.content.clone()),
            })
            .collect();
        self.orchestrator.resume(&mut self.session, prior);

        info!(conversation = %id, messages = messages.len(), "switched conversation");
        self.conversation_id = id;
        self.messages = messages;
        Ok(())
    }

    /// Drop a conversation from the history index and apply the configured
    /// remote delete policy. Deleting the active conversation starts a new one.
    pub async fn delete_conversation(&mut self, id: &ConversationId) -> Result<(), ChatError> {
        if !self.history.remove(id) {
            debug!(conversation = %id, "conversation not in history index");
        }
        if &self.conversation_id == id {
            self.start_new_conversation();
        }
        if let Err(e) = self.bridge.delete(id).await {
            warn!(conversation = %id, error = %e, "remote delete failed");
            return Err(e.into());
        }
        Ok(())
    }

    /// Populate the history index from the store.
    pub async fn load_history(&mut self) -> Result<&HistoryIndex, ChatError> {
        let summaries = self.bridge.list_summaries().await?;
        debug!(
            backend = self.bridge.backend_name(),
            count = summaries.len(),
            "loaded conversation history"
        );
        self.history.replace_all(summaries);
        Ok(&self.history)
    }

    /// Wait for outstanding writes, e.g. before exiting.
    pub async fn flush(&mut self) {
        self.bridge.flush().await;
    }
}
