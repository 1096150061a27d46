//! ConversationSession struct and history bookkeeping.

use skillflow_common::UserContext;

use crate::Message;

/// Turn history sent to the provider on every request.
#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    /// Primer turns followed by real turns, in send order.
    pub(crate) turns: Vec<Message>,
    /// Who the assistant is talking to, if known.
    pub(crate) user_context: Option<UserContext>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_context(mut self, context: UserContext) -> Self {
        self.user_context = Some(context);
        self
    }

    /// Replace the user context. Takes effect the next time the primer is
    /// injected, i.e. after `clear_history`.
    pub fn set_user_context(&mut self, context: UserContext) {
        self.user_context = Some(context);
    }

    pub fn user_context(&self) -> Option<&UserContext> {
        self.user_context.as_ref()
    }

    /// Full history, primer included.
    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    /// Number of turns, primer included.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn. The primer is re-injected on the next send.
    pub fn clear_history(&mut self) {
        self.turns.clear();
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.turns.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillflow_common::UserRole;

    #[test]
    fn starts_empty() {
        let session = ConversationSession::new();
        assert!(session.is_empty());
        assert!(session.user_context().is_none());
    }

    #[test]
    fn clear_drops_all_turns_but_keeps_context() {
        let mut session =
            ConversationSession::new().with_user_context(UserContext::new("Ada", UserRole::Student));
        session.push(Message::user("a"));
        session.push(Message::assistant("b"));
        assert_eq!(session.len(), 2);

        session.clear_history();
        assert!(session.is_empty());
        assert_eq!(session.user_context().unwrap().name, "Ada");
    }
}
