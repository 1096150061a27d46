//! In-memory chat repository.
//! Not persistent across runs; used for offline mode and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use skillflow_common::ConversationId;

use crate::StoreError;

use super::model::{ChatDocument, ConversationRecord, ConversationSummary, StoredMessage};
use super::{sort_recent_first, ChatRepository};

type UserChats = HashMap<ConversationId, ChatDocument>;

#[derive(Default)]
pub struct MemoryChatRepository {
    data: Mutex<HashMap<String, UserChats>>,
    fail_writes: AtomicBool,
}

impl MemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, to exercise error paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Number of stored conversations for `uid`, archived ones included.
    pub fn conversation_count(&self, uid: &str) -> usize {
        self.lock().get(uid).map(HashMap::len).unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserChats>> {
        // A panic while holding the lock leaves plain data behind.
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Network("memory store set to fail writes".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatRepository for MemoryChatRepository {
    async fn upsert_conversation(
        &self,
        uid: &str,
        record: &ConversationRecord,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut data = self.lock();
        let doc = data
            .entry(uid.to_string())
            .or_default()
            .entry(record.id.clone())
            .or_default();
        doc.title = Some(record.title.clone());
        doc.messages = record.messages.clone();
        doc.message_count = Some(record.message_count() as u64);
        doc.timestamp = Some(Utc::now());
        doc.archived = false;
        Ok(())
    }

    async fn list_summaries(&self, uid: &str) -> Result<Vec<ConversationSummary>, StoreError> {
        let data = self.lock();
        let mut summaries: Vec<ConversationSummary> = data
            .get(uid)
            .map(|chats| {
                chats
                    .iter()
                    .filter(|(_, doc)| !doc.archived)
                    .map(|(id, doc)| doc.summary(id.clone()))
                    .collect()
            })
            .unwrap_or_default();
        sort_recent_first(&mut summaries);
        Ok(summaries)
    }

    async fn load_messages(
        &self,
        uid: &str,
        id: &ConversationId,
    ) -> Result<Option<Vec<StoredMessage>>, StoreError> {
        Ok(self
            .lock()
            .get(uid)
            .and_then(|chats| chats.get(id))
            .map(|doc| doc.messages.clone()))
    }

    async fn archive_conversation(
        &self,
        uid: &str,
        id: &ConversationId,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        if let Some(doc) = self.lock().get_mut(uid).and_then(|chats| chats.get_mut(id)) {
            doc.archived = true;
            doc.timestamp = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete_conversation(&self, uid: &str, id: &ConversationId) -> Result<(), StoreError> {
        self.check_writable()?;
        if let Some(chats) = self.lock().get_mut(uid) {
            chats.remove(id);
        }
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
