use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use skillflow_common::UserRole;

/// SkillFlow: learning assistant chat, history and accounts from the terminal.
#[derive(Parser, Debug)]
#[command(name = "skillflow", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Keep accounts and chats in memory instead of Firebase.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Account email. Falls back to SKILLFLOW_EMAIL, then a prompt.
    #[arg(long, global = true)]
    pub email: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chat with the assistant (interactive).
    Chat {
        /// Resume a stored conversation instead of starting a new one.
        #[arg(long)]
        resume: Option<String>,
    },
    /// List stored conversations, most recent first.
    History,
    /// Print the messages of one conversation.
    Show { id: String },
    /// Remove a conversation from the history.
    Delete { id: String },
    /// Create an account.
    Signup(SignupArgs),
    /// Show or edit your profile.
    Profile(ProfileArgs),
    /// Change your password.
    Passwd,
    /// User administration (admins only).
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(ClapArgs, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,
    /// Phone number including the dialling code.
    #[arg(long)]
    pub phone: String,
    #[arg(long, default_value = "student", value_parser = parse_role)]
    pub role: UserRole,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
}

impl ProfileArgs {
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.bio.is_some()
            || self.phone.is_some()
            || self.location.is_some()
            || self.department.is_some()
    }
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List every profile.
    List,
    /// Give a user the admin role.
    Promote { uid: String },
    Suspend { uid: String },
    Unsuspend { uid: String },
    /// Delete a user's profile document.
    Delete { uid: String },
}

fn parse_role(value: &str) -> Result<UserRole, String> {
    value.parse()
}

pub fn parse() -> Args {
    Args::parse()
}
