//! One-way sync from the active conversation to the chat store.

use std::sync::Arc;

use skillflow_common::ConversationId;
use skillflow_config::{DeletePolicy, WriteMode};
use skillflow_store::{ChatRepository, ConversationRecord, ConversationSummary, StoreError, StoredMessage};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct PersistenceBridge {
    repo: Arc<dyn ChatRepository>,
    uid: String,
    write_mode: WriteMode,
    delete_policy: DeletePolicy,
    /// Last spawned write. Each new write waits on it so writes land in order.
    pending: Option<JoinHandle<()>>,
}

impl PersistenceBridge {
    pub fn new(repo: Arc<dyn ChatRepository>, uid: impl Into<String>) -> Self {
        Self {
            repo,
            uid: uid.into(),
            write_mode: WriteMode::default(),
            delete_policy: DeletePolicy::default(),
            pending: None,
        }
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    pub fn backend_name(&self) -> &str {
        self.repo.backend_name()
    }

    /// Write the full conversation state. In fire-and-forget mode failures
    /// are only logged.
    pub async fn persist(&mut self, record: ConversationRecord) -> Result<(), StoreError> {
        match self.write_mode {
            WriteMode::Awaited => {
                self.flush().await;
                self.repo.upsert_conversation(&self.uid, &record).await
            }
            WriteMode::FireAndForget => {
                let repo = Arc::clone(&self.repo);
                let uid = self.uid.clone();
                let previous = self.pending.take();
                self.pending = Some(tokio::spawn(async move {
                    if let Some(previous) = previous {
                        if let Err(e) = previous.await {
                            warn!(error = %e, "earlier conversation write task failed");
                        }
                    }
                    match repo.upsert_conversation(&uid, &record).await {
                        Ok(()) => debug!(
                            conversation = %record.id,
                            messages = record.message_count(),
                            "conversation saved"
                        ),
                        Err(e) => warn!(
                            conversation = %record.id,
                            error = %e,
                            "failed to save conversation"
                        ),
                    }
                }));
                Ok(())
            }
        }
    }

    /// Wait for any spawned write to finish.
    pub async fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            if let Err(e) = pending.await {
                warn!(error = %e, "conversation write task failed");
            }
        }
    }

    pub async fn list_summaries(&mut self) -> Result<Vec<ConversationSummary>, StoreError> {
        // Reads see our own writes.
        self.flush().await;
        self.repo.list_summaries(&self.uid).await
    }

    pub async fn load_messages(
        &mut self,
        id: &ConversationId,
    ) -> Result<Option<Vec<StoredMessage>>, StoreError> {
        self.flush().await;
        self.repo.load_messages(&self.uid, id).await
    }

    /// Apply the configured delete policy on the remote side.
    pub async fn delete(&mut self, id: &ConversationId) -> Result<(), StoreError> {
        self.flush().await;
        match self.delete_policy {
            DeletePolicy::LocalOnly => Ok(()),
            DeletePolicy::Archive => self.repo.archive_conversation(&self.uid, id).await,
            DeletePolicy::Remote => self.repo.delete_conversation(&self.uid, id).await,
        }
    }
}
