//! Remote document storage for SkillFlow.
//!
//! A thin Firestore REST client plus the two repositories built on it:
//! per-user chat documents (`users/{uid}/chats/{chatId}`) and profile
//! documents (`profiles/{uid}`). Each repository also has an in-memory
//! implementation used for offline mode and tests.

pub mod chat;
pub mod firestore;
pub mod profile;

pub use chat::{
    ChatRepository, ChatRole, ConversationRecord, ConversationSummary, FirestoreChatRepository,
    MemoryChatRepository, StoredMessage, UNTITLED_CHAT,
};
pub use firestore::{Document, FirestoreClient, FirestoreConfig};
pub use profile::{
    FirestoreProfileRepository, MemoryProfileRepository, ProfileRepository, ProfileUpdate,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("store returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("codec error: {0}")]
    Codec(String),
}

impl From<StoreError> for skillflow_common::SkillflowError {
    fn from(err: StoreError) -> Self {
        skillflow_common::SkillflowError::Store(err.to_string())
    }
}
