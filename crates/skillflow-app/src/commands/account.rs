//! Sign-up, profile and password commands.

use skillflow_account::SignUpRequest;
use skillflow_common::{SkillflowError, UserProfile};
use skillflow_store::ProfileUpdate;
use tokio::io::AsyncBufRead;

use crate::cli::{ProfileArgs, SignupArgs};
use crate::console::{value_or_prompt, Console};
use crate::services::Services;

pub async fn signup<R: AsyncBufRead + Unpin>(
    services: &Services,
    console: &mut Console<R>,
    email: Option<&str>,
    args: SignupArgs,
) -> Result<(), SkillflowError> {
    let accounts = services.accounts()?;
    let email = value_or_prompt(console, email, "SKILLFLOW_EMAIL", "Email: ").await?;
    let password = console.require("Password: ").await?;
    let confirm_password = console.require("Confirm password: ").await?;

    let request = SignUpRequest {
        display_name: args.name,
        email,
        phone: args.phone,
        password,
        confirm_password,
        role: args.role,
    };
    match accounts.auth.sign_up(request).await {
        Ok(signed) => {
            println!(
                "Account created successfully. Welcome to SkillFlow, {}!",
                signed.profile.display_name
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

pub(crate) fn profile_update(args: ProfileArgs) -> ProfileUpdate {
    ProfileUpdate {
        display_name: args.name,
        bio: args.bio,
        phone: args.phone,
        location: args.location,
        department: args.department,
        ..Default::default()
    }
}

fn field_line(label: &str, value: &str) -> String {
    format!("{:<8}{value}", format!("{label}:"))
}

pub(crate) fn format_profile(profile: &UserProfile) -> Vec<String> {
    let mut lines = vec![
        field_line("Name", &profile.display_name),
        field_line("Email", &profile.email),
        field_line("Role", profile.role.as_str()),
        field_line("Bio", &profile.bio),
    ];
    for (label, value) in [
        ("Phone", &profile.phone),
        ("Place", &profile.location),
        ("Dept", &profile.department),
    ] {
        if !value.is_empty() {
            lines.push(field_line(label, value));
        }
    }
    if profile.suspended {
        lines.push(field_line("Status", "suspended"));
    }
    lines
}

pub async fn profile(services: &Services, args: ProfileArgs) -> Result<(), SkillflowError> {
    let auth = &services.accounts()?.auth;
    if args.has_changes() {
        if let Err(e) = auth.update_profile(profile_update(args)).await {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
        println!("Profile updated successfully");
    }
    let profile = auth.profile().await?;
    for line in format_profile(&profile) {
        println!("{line}");
    }
    Ok(())
}

pub async fn passwd<R: AsyncBufRead + Unpin>(
    services: &Services,
    console: &mut Console<R>,
) -> Result<(), SkillflowError> {
    let auth = &services.accounts()?.auth;
    let current = console.require("Current password: ").await?;
    let new = console.require("New password: ").await?;
    let confirm = console.require("Confirm new password: ").await?;

    match auth.change_password(&current, &new, &confirm).await {
        Ok(()) => {
            println!("Password changed successfully");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillflow_common::UserRole;

    #[test]
    fn only_given_fields_are_updated() {
        let update = profile_update(ProfileArgs {
            bio: Some("Maths tutor".into()),
            ..Default::default()
        });
        assert_eq!(update.bio.as_deref(), Some("Maths tutor"));
        assert!(update.display_name.is_none());
        assert!(update.role.is_none());
    }

    #[test]
    fn profile_lines_skip_empty_optional_fields() {
        let profile = UserProfile {
            display_name: "Grace".into(),
            email: "grace@example.com".into(),
            role: UserRole::Teacher,
            department: "Computing".into(),
            ..Default::default()
        };
        let lines = format_profile(&profile);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "Role:   teacher");
        assert_eq!(lines[4], "Dept:   Computing");
    }
}
