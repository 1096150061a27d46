//! Firestore-backed chat repository.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use skillflow_common::ConversationId;

use crate::firestore::{FieldFilter, FirestoreClient};
use crate::StoreError;

use super::model::{ChatDocument, ConversationRecord, ConversationSummary, StoredMessage};
use super::{sort_recent_first, ChatRepository};

pub struct FirestoreChatRepository {
    client: Arc<FirestoreClient>,
}

impl FirestoreChatRepository {
    pub fn new(client: Arc<FirestoreClient>) -> Self {
        Self { client }
    }

    fn chat_path(uid: &str, id: &ConversationId) -> String {
        format!("users/{uid}/chats/{id}")
    }
}

#[async_trait]
impl ChatRepository for FirestoreChatRepository {
    async fn upsert_conversation(
        &self,
        uid: &str,
        record: &ConversationRecord,
    ) -> Result<(), StoreError> {
        let messages =
            serde_json::to_value(&record.messages).map_err(|e| StoreError::Codec(e.to_string()))?;

        let mut fields = Map::new();
        fields.insert("title".into(), Value::from(record.title.clone()));
        fields.insert("messages".into(), messages);
        fields.insert("messageCount".into(), Value::from(record.message_count() as u64));
        fields.insert("archived".into(), Value::from(false));

        self.client
            .merge_document(&Self::chat_path(uid, &record.id), &fields, &["timestamp"])
            .await
    }

    async fn list_summaries(&self, uid: &str) -> Result<Vec<ConversationSummary>, StoreError> {
        let docs = self
            .client
            .run_query(
                &format!("users/{uid}"),
                "chats",
                Some(FieldFilter::equals("archived", false)),
            )
            .await?;

        let mut summaries = docs
            .iter()
            .map(|doc| {
                doc.deserialize::<ChatDocument>()
                    .map(|chat| chat.summary(ConversationId::from(doc.id())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        sort_recent_first(&mut summaries);
        Ok(summaries)
    }

    async fn load_messages(
        &self,
        uid: &str,
        id: &ConversationId,
    ) -> Result<Option<Vec<StoredMessage>>, StoreError> {
        let Some(doc) = self.client.get_document(&Self::chat_path(uid, id)).await? else {
            return Ok(None);
        };
        let chat: ChatDocument = doc.deserialize()?;
        Ok(Some(chat.messages))
    }

    async fn archive_conversation(
        &self,
        uid: &str,
        id: &ConversationId,
    ) -> Result<(), StoreError> {
        let mut fields = Map::new();
        fields.insert("archived".into(), Value::from(true));
        self.client
            .merge_document(&Self::chat_path(uid, id), &fields, &["timestamp"])
            .await
    }

    async fn delete_conversation(&self, uid: &str, id: &ConversationId) -> Result<(), StoreError> {
        self.client.delete_document(&Self::chat_path(uid, id)).await
    }

    fn backend_name(&self) -> &str {
        "firestore"
    }
}
