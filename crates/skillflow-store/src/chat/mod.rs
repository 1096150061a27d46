//! Per-user chat persistence.
//!
//! One document per conversation at `users/{uid}/chats/{chatId}` holding the
//! full message array, the derived title and count, a server-assigned
//! `timestamp`, and an `archived` flag.

mod firestore;
mod memory;
mod model;

pub use firestore::FirestoreChatRepository;
pub use memory::MemoryChatRepository;
pub use model::{
    ChatRole, ConversationRecord, ConversationSummary, StoredMessage, UNTITLED_CHAT,
};

use async_trait::async_trait;
use skillflow_common::ConversationId;

use crate::StoreError;

/// Storage port for conversations. Last writer wins; no concurrency control.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Merge-upsert the conversation; sets `archived = false` and stamps the
    /// update time.
    async fn upsert_conversation(
        &self,
        uid: &str,
        record: &ConversationRecord,
    ) -> Result<(), StoreError>;

    /// Non-archived summaries, most recently updated first.
    async fn list_summaries(&self, uid: &str) -> Result<Vec<ConversationSummary>, StoreError>;

    /// Full message list, or `None` when the conversation does not exist.
    async fn load_messages(
        &self,
        uid: &str,
        id: &ConversationId,
    ) -> Result<Option<Vec<StoredMessage>>, StoreError>;

    /// Hide the conversation from summaries without deleting it.
    async fn archive_conversation(&self, uid: &str, id: &ConversationId)
        -> Result<(), StoreError>;

    async fn delete_conversation(&self, uid: &str, id: &ConversationId) -> Result<(), StoreError>;

    /// Name of this backend (for logging).
    fn backend_name(&self) -> &str;
}

/// Sort summaries most recent first.
pub(crate) fn sort_recent_first(summaries: &mut [ConversationSummary]) {
    summaries.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
}
