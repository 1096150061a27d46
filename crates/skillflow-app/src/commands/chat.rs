//! Interactive chat and conversation history.

use chrono::Local;
use skillflow_account::SignedIn;
use skillflow_chat::{ChatController, ChatError};
use skillflow_common::{ConversationId, SkillflowError};
use skillflow_config::DeletePolicy;
use skillflow_store::{ChatRole, ConversationSummary, StoredMessage};
use tokio::io::AsyncBufRead;
use tracing::debug;

use crate::console::Console;
use crate::services::Services;

const HELP: &str = "Commands: /new  /history  /open <id>  /delete <id>  /help  /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplAction {
    Send(String),
    New,
    History,
    Open(String),
    Delete(String),
    Help,
    Quit,
    Nothing,
}

pub(crate) fn parse_line(line: &str) -> ReplAction {
    let line = line.trim();
    if line.is_empty() {
        return ReplAction::Nothing;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplAction::Send(line.to_string());
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(n, r)| (n, r.trim()))
        .unwrap_or((command, ""));
    match (name, rest) {
        ("new" | "clear", _) => ReplAction::New,
        ("history", _) => ReplAction::History,
        ("open", id) if !id.is_empty() => ReplAction::Open(id.to_string()),
        ("delete", id) if !id.is_empty() => ReplAction::Delete(id.to_string()),
        ("quit" | "exit", _) => ReplAction::Quit,
        _ => ReplAction::Help,
    }
}

pub(crate) fn format_summary(summary: &ConversationSummary) -> String {
    format!(
        "{}  {}  ({} messages, {})",
        summary.id,
        summary.title,
        summary.message_count,
        summary.last_updated.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    )
}

pub(crate) fn format_message(message: &StoredMessage) -> String {
    let who = match message.role {
        ChatRole::User => "You",
        ChatRole::Assistant => "SkillFlow AI",
    };
    format!("{who}: {}", message.content)
}

/// Apply one REPL action. Returns the lines to print, or `None` to quit.
pub(crate) async fn apply(
    controller: &mut ChatController,
    action: ReplAction,
) -> Option<Vec<String>> {
    let lines = match action {
        ReplAction::Quit => return None,
        ReplAction::Nothing => Vec::new(),
        ReplAction::Help => vec![HELP.to_string()],
        ReplAction::Send(text) => match controller.send(&text).await {
            Ok(reply) => vec![format!("SkillFlow AI: {reply}")],
            Err(ChatError::Ai(e)) => {
                // The controller already recorded the notice as the reply.
                let notice = controller
                    .messages()
                    .last()
                    .map(format_message)
                    .unwrap_or_else(|| e.user_message());
                vec![notice]
            }
            Err(e) => vec![e.user_message()],
        },
        ReplAction::New => {
            controller.start_new_conversation();
            vec!["Started a new conversation.".to_string()]
        }
        ReplAction::History => match controller.load_history().await {
            Ok(index) if index.is_empty() => vec!["No conversations yet.".to_string()],
            Ok(index) => index.entries().iter().map(format_summary).collect(),
            Err(e) => vec![e.user_message()],
        },
        ReplAction::Open(id) => {
            match controller.switch_conversation(ConversationId::from(id)).await {
                Ok(()) if controller.messages().is_empty() => {
                    vec!["That conversation is empty.".to_string()]
                }
                Ok(()) => controller.messages().iter().map(format_message).collect(),
                Err(e) => vec![e.user_message()],
            }
        }
        ReplAction::Delete(id) => {
            match controller.delete_conversation(&ConversationId::from(id)).await {
                Ok(()) => vec!["Conversation removed.".to_string()],
                Err(e) => vec![e.user_message()],
            }
        }
    };
    Some(lines)
}

pub async fn repl<R: AsyncBufRead + Unpin>(
    services: &Services,
    console: &mut Console<R>,
    user: &SignedIn,
    resume: Option<String>,
) -> Result<(), SkillflowError> {
    let mut controller = services.chat_controller(services.orchestrator()?, user);
    if let Err(e) = controller.load_history().await {
        eprintln!("Could not load chat history: {}", e.user_message());
    }
    if let Some(id) = resume {
        for line in apply(&mut controller, ReplAction::Open(id)).await.unwrap_or_default() {
            println!("{line}");
        }
    }

    println!("Hi {}! Ask me anything. {HELP}", user.profile.display_name);
    while let Some(line) = console.prompt("> ").await? {
        let action = parse_line(&line);
        debug!(?action, "repl action");
        match apply(&mut controller, action).await {
            Some(lines) => lines.iter().for_each(|l| println!("{l}")),
            None => break,
        }
    }

    controller.flush().await;
    Ok(())
}

pub async fn history(services: &Services, user: &SignedIn) -> Result<(), SkillflowError> {
    let summaries = services
        .bridge(&user.session.uid)
        .list_summaries()
        .await
        .map_err(ChatError::from)?;
    if summaries.is_empty() {
        println!("No conversations yet.");
    }
    for summary in &summaries {
        println!("{}", format_summary(summary));
    }
    Ok(())
}

pub async fn show(services: &Services, user: &SignedIn, id: String) -> Result<(), SkillflowError> {
    let messages = services
        .bridge(&user.session.uid)
        .load_messages(&ConversationId::from(id))
        .await
        .map_err(ChatError::from)?
        .unwrap_or_default();
    if messages.is_empty() {
        println!("No conversation with that id.");
    }
    for message in &messages {
        println!("{}", format_message(message));
    }
    Ok(())
}

pub async fn delete(services: &Services, user: &SignedIn, id: String) -> Result<(), SkillflowError> {
    let mut bridge = services.bridge(&user.session.uid);
    bridge
        .delete(&ConversationId::from(id))
        .await
        .map_err(ChatError::from)?;
    let outcome = match bridge.delete_policy() {
        DeletePolicy::LocalOnly => "hidden locally; the stored copy is kept",
        DeletePolicy::Archive => "archived",
        DeletePolicy::Remote => "deleted from the store",
    };
    println!("Conversation removed ({outcome}).");
    Ok(())
}
