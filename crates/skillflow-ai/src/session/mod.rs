//! Conversation session state.
//!
//! A `ConversationSession` holds the provider-facing turn history of one
//! conversation (primer included) and the user context used to personalise
//! the primer. It is an explicit value handed to the `Orchestrator`, so two
//! conversations never share history by accident.

mod conversation;

pub use conversation::ConversationSession;
