//! Subcommand handlers.

mod account;
mod chat;
mod users;

use skillflow_account::SignedIn;
use skillflow_common::SkillflowError;
use tokio::io::AsyncBufRead;

use crate::cli::{Args, Command};
use crate::console::{value_or_prompt, Console};
use crate::services::Services;

pub async fn run<R: AsyncBufRead + Unpin>(
    args: Args,
    services: &Services,
    console: &mut Console<R>,
) -> Result<(), SkillflowError> {
    match args.command {
        Command::Signup(signup) => {
            account::signup(services, console, args.email.as_deref(), signup).await
        }
        command => {
            let user = sign_in(services, console, args.email.as_deref()).await?;
            match command {
                Command::Chat { resume } => chat::repl(services, console, &user, resume).await,
                Command::History => chat::history(services, &user).await,
                Command::Show { id } => chat::show(services, &user, id).await,
                Command::Delete { id } => chat::delete(services, &user, id).await,
                Command::Profile(edit) => account::profile(services, edit).await,
                Command::Passwd => account::passwd(services, console).await,
                Command::Users(cmd) => users::run(services, &user, cmd).await,
                // Handled above.
                Command::Signup(_) => Ok(()),
            }
        }
    }
}

/// Sign in with email and password, or use the offline identity.
async fn sign_in<R: AsyncBufRead + Unpin>(
    services: &Services,
    console: &mut Console<R>,
    email: Option<&str>,
) -> Result<SignedIn, SkillflowError> {
    if services.is_offline() {
        return Ok(services.offline_user());
    }
    let email = value_or_prompt(console, email, "SKILLFLOW_EMAIL", "Email: ").await?;
    let password = value_or_prompt(console, None, "SKILLFLOW_PASSWORD", "Password: ").await?;

    let accounts = services.accounts()?;
    match accounts.auth.sign_in(&email, &password).await {
        Ok(user) => Ok(user),
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}
