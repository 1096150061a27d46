//! Admin-only user management.

use skillflow_account::{AccountError, SignedIn};
use skillflow_common::{SkillflowError, UserProfile};

use crate::cli::UsersCommand;
use crate::services::Services;

pub(crate) fn format_user(user: &UserProfile) -> String {
    let status = if user.suspended { "  [suspended]" } else { "" };
    format!(
        "{}  {} <{}>  {}{status}",
        user.uid, user.display_name, user.email, user.role
    )
}

pub async fn run(
    services: &Services,
    actor: &SignedIn,
    command: UsersCommand,
) -> Result<(), SkillflowError> {
    let admin = &services.accounts()?.admin;
    let me = actor.session.uid.as_str();

    let result: Result<&str, AccountError> = match command {
        UsersCommand::List => match admin.list_users(me).await {
            Ok(users) => {
                for user in &users {
                    println!("{}", format_user(user));
                }
                return Ok(());
            }
            Err(e) => Err(e),
        },
        UsersCommand::Promote { uid } => admin
            .promote_to_admin(me, &uid)
            .await
            .map(|_| "User promoted to admin"),
        UsersCommand::Suspend { uid } => admin.suspend(me, &uid).await.map(|_| "User suspended"),
        UsersCommand::Unsuspend { uid } => {
            admin.unsuspend(me, &uid).await.map(|_| "User unsuspended")
        }
        UsersCommand::Delete { uid } => admin.delete_user(me, &uid).await.map(|_| "User deleted"),
    };

    match result {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}
