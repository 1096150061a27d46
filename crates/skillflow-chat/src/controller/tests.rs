use std::sync::Arc;
use std::time::Duration;

use skillflow_ai::testing::ScriptedClient;
use skillflow_ai::Role;
use skillflow_common::UserRole;
use skillflow_config::{DeletePolicy, WriteMode};
use skillflow_store::{ChatRepository, MemoryChatRepository, StoreError};

use super::*;

const UID: &str = "student-1";

struct Harness {
    client: Arc<ScriptedClient>,
    repo: Arc<MemoryChatRepository>,
    controller: ChatController,
}

fn harness_with(client: ScriptedClient, policy: DeletePolicy) -> Harness {
    let client = Arc::new(client);
    let repo = Arc::new(MemoryChatRepository::new());
    let bridge = PersistenceBridge::new(repo.clone(), UID)
        .with_write_mode(WriteMode::Awaited)
        .with_delete_policy(policy);
    let controller = ChatController::new(Orchestrator::new(client.clone()), bridge)
        .with_user_context(UserContext::new("Ada", UserRole::Student));
    Harness {
        client,
        repo,
        controller,
    }
}

fn harness() -> Harness {
    harness_with(ScriptedClient::new(), DeletePolicy::LocalOnly)
}

#[tokio::test]
async fn first_message_in_fresh_conversation() {
    let mut h = harness();
    h.client.push_reply("Quantum physics describes how very small things behave.");

    let reply = h
        .controller
        .send("Explain quantum physics simply")
        .await
        .unwrap();
    assert_eq!(reply, "Quantum physics describes how very small things behave.");

    // Two primer turns plus the user turn went out.
    let sent = h.client.requests();
    assert_eq!(sent[0].len(), 3);
    assert_eq!(sent[0][2], Message::user("Explain quantum physics simply"));

    let messages = h.controller.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::User);
    assert_eq!(messages[1].role, ChatRole::Assistant);
    assert_eq!(messages[1].content, reply);

    let summary = h.controller.history().get(h.controller.conversation_id()).unwrap();
    assert_eq!(summary.message_count, 2);
    assert_eq!(summary.title, "Explain quantum physics simply");

    let stored = h.repo.list_summaries(UID).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message_count, 2);
}

#[tokio::test]
async fn message_ids_are_time_ordered() {
    let mut h = harness();
    h.client.push_reply("a");
    h.client.push_reply("b");
    h.controller.send("one").await.unwrap();
    h.controller.send("two").await.unwrap();

    let ids: Vec<u64> = h
        .controller
        .messages()
        .iter()
        .map(|m| m.id.parse().unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn clear_chat_reinjects_primer() {
    let mut h = harness();
    h.client.push_reply("first reply");
    h.client.push_reply("second reply");

    h.controller.send("first").await.unwrap();
    let first_id = h.controller.conversation_id().clone();

    h.controller.clear_chat();
    assert!(h.controller.messages().is_empty());
    assert_ne!(h.controller.conversation_id(), &first_id);

    h.controller.send("fresh start").await.unwrap();
    let sent = h.client.requests();
    assert_eq!(sent[1].len(), 3);
    assert_eq!(sent[1][2], Message::user("fresh start"));

    // Both conversations are listed, newest first.
    let history = h.controller.history().entries();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].title, "fresh start");
}

#[tokio::test]
async fn title_is_first_forty_characters() {
    let mut h = harness();
    h.client.push_reply("ok");
    let long = "Können Sie mir erklären, wie Photosynthese in Pflanzen funktioniert?";

    h.controller.send(long).await.unwrap();

    let summary = &h.controller.history().entries()[0];
    assert_eq!(summary.title.chars().count(), TITLE_MAX_CHARS);
    assert!(long.starts_with(&summary.title));
}

#[tokio::test]
async fn switching_to_unknown_conversation_yields_empty_list() {
    let mut h = harness();
    h.client.push_reply("hi");
    h.controller.send("hello").await.unwrap();

    h.controller
        .switch_conversation(ConversationId::from("does-not-exist"))
        .await
        .unwrap();

    assert!(h.controller.messages().is_empty());
    assert!(h.controller.session().is_empty());
    assert_eq!(h.controller.conversation_id().as_str(), "does-not-exist");
}

#[tokio::test]
async fn switching_back_restores_messages_and_context() {
    let mut h = harness();
    h.client.push_reply("Photosynthesis turns light into sugar.");
    h.client.push_reply("unrelated");
    h.client.push_reply("Chlorophyll absorbs the light.");

    h.controller.send("What is photosynthesis?").await.unwrap();
    let biology = h.controller.conversation_id().clone();

    h.controller.start_new_conversation();
    h.controller.send("Something else").await.unwrap();

    h.controller.switch_conversation(biology.clone()).await.unwrap();
    assert_eq!(h.controller.conversation_id(), &biology);
    assert_eq!(h.controller.messages().len(), 2);
    assert_eq!(h.controller.messages()[0].content, "What is photosynthesis?");

    h.controller.send("Which pigment?").await.unwrap();
    let last = h.client.requests().pop().unwrap();
    // Primer, the two restored turns, the follow-up.
    assert_eq!(last.len(), 5);
    assert_eq!(last[1].role, Role::Assistant);
    assert_eq!(last[2], Message::user("What is photosynthesis?"));
    assert_eq!(last[4], Message::user("Which pigment?"));

    let stored = h.repo.load_messages(UID, &biology).await.unwrap().unwrap();
    assert_eq!(stored.len(), 4);
}

#[tokio::test]
async fn failed_request_appends_error_notice() {
    let mut h = harness();
    h.client.push(Err(AiError::RateLimited));

    let err = h.controller.send("hello").await.unwrap_err();
    assert_eq!(err, ChatError::Ai(AiError::RateLimited));

    let messages = h.controller.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, ChatRole::Assistant);
    assert_eq!(
        messages[1].content,
        "Sorry, I encountered an error: Too many requests. Please try again later."
    );
    assert_eq!(h.controller.history().entries()[0].message_count, 2);
}

#[tokio::test(start_paused = true)]
async fn slow_request_times_out_with_notice() {
    let mut h = harness_with(
        ScriptedClient::new().with_delay(Duration::from_secs(45)),
        DeletePolicy::LocalOnly,
    );
    h.client.push_reply("too late");

    let err = h.controller.send("hello").await.unwrap_err();
    assert_eq!(err, ChatError::Ai(AiError::Timeout(30)));
    assert_eq!(
        h.controller.messages()[1].content,
        "Sorry, I encountered an error: Request timeout. Please try again."
    );
}

#[tokio::test]
async fn blank_input_changes_nothing() {
    let mut h = harness();

    let err = h.controller.send("  \n").await.unwrap_err();
    assert_eq!(err, ChatError::Ai(AiError::EmptyInput));
    assert!(h.controller.messages().is_empty());
    assert!(h.controller.history().is_empty());
    assert!(h.client.requests().is_empty());
    assert_eq!(h.repo.conversation_count(UID), 0);
}

#[tokio::test]
async fn load_history_lists_stored_conversations() {
    let mut h = harness();
    h.client.push_reply("a");
    h.client.push_reply("b");
    h.controller.send("older").await.unwrap();
    h.controller.start_new_conversation();
    h.controller.send("newer").await.unwrap();

    let mut fresh = harness();
    let bridge = PersistenceBridge::new(h.repo.clone(), UID);
    fresh.controller = ChatController::new(Orchestrator::new(fresh.client.clone()), bridge);

    let history = fresh.controller.load_history().await.unwrap();
    let titles: Vec<&str> = history.entries().iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["newer", "older"]);
}

#[tokio::test]
async fn deleting_active_conversation_starts_new_one() {
    let mut h = harness();
    h.client.push_reply("a");
    h.controller.send("hello").await.unwrap();
    let id = h.controller.conversation_id().clone();

    h.controller.delete_conversation(&id).await.unwrap();

    assert!(h.controller.history().is_empty());
    assert_ne!(h.controller.conversation_id(), &id);
    assert!(h.controller.messages().is_empty());
    // Local-only: the stored document is untouched.
    assert_eq!(h.repo.conversation_count(UID), 1);
}

#[tokio::test]
async fn remote_delete_policy_removes_document() {
    let mut h = harness_with(ScriptedClient::new(), DeletePolicy::Remote);
    h.client.push_reply("a");
    h.client.push_reply("b");
    h.controller.send("keep me").await.unwrap();
    let keep = h.controller.conversation_id().clone();
    h.controller.start_new_conversation();
    h.controller.send("drop me").await.unwrap();
    let drop = h.controller.conversation_id().clone();

    h.controller.switch_conversation(keep.clone()).await.unwrap();
    h.controller.delete_conversation(&drop).await.unwrap();

    assert_eq!(h.controller.conversation_id(), &keep);
    assert_eq!(h.controller.history().len(), 1);
    assert_eq!(h.repo.conversation_count(UID), 1);
}

#[tokio::test]
async fn awaited_persistence_failure_is_surfaced() {
    let mut h = harness();
    h.repo.set_fail_writes(true);

    let err = h.controller.send("hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Persistence(StoreError::Network(_))));
    // The message stays visible locally.
    assert_eq!(h.controller.messages().len(), 1);
    assert!(h.client.requests().is_empty());
}

#[tokio::test]
async fn fire_and_forget_failure_does_not_interrupt_chat() {
    let client = Arc::new(ScriptedClient::new());
    client.push_reply("still here");
    let repo = Arc::new(MemoryChatRepository::new());
    repo.set_fail_writes(true);
    let bridge = PersistenceBridge::new(repo.clone(), UID);
    let mut controller = ChatController::new(Orchestrator::new(client.clone()), bridge);

    let reply = controller.send("hello").await.unwrap();
    controller.flush().await;

    assert_eq!(reply, "still here");
    assert_eq!(controller.messages().len(), 2);
    assert_eq!(repo.conversation_count(UID), 0);
}
