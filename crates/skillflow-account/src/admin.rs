//! User administration, limited to admin profiles.

use std::sync::Arc;

use skillflow_common::{UserProfile, UserRole};
use skillflow_store::{ProfileRepository, ProfileUpdate};
use tracing::info;

use crate::AccountError;

pub struct AdminService {
    profiles: Arc<dyn ProfileRepository>,
}

impl AdminService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Load the acting user's profile and check it carries the admin role.
    async fn require_admin(&self, actor_uid: &str) -> Result<UserProfile, AccountError> {
        match self.profiles.get_profile(actor_uid).await? {
            Some(profile) if profile.is_admin() && !profile.suspended => Ok(profile),
            _ => Err(AccountError::Forbidden),
        }
    }

    async fn require_target(&self, uid: &str) -> Result<UserProfile, AccountError> {
        self.profiles
            .get_profile(uid)
            .await?
            .ok_or_else(|| AccountError::NotFound(uid.to_string()))
    }

    fn refuse_self(actor_uid: &str, target_uid: &str, action: &str) -> Result<(), AccountError> {
        if actor_uid == target_uid {
            return Err(AccountError::InvalidInput(format!(
                "You cannot {action} your own account"
            )));
        }
        Ok(())
    }

    pub async fn list_users(&self, actor_uid: &str) -> Result<Vec<UserProfile>, AccountError> {
        self.require_admin(actor_uid).await?;
        Ok(self.profiles.list_profiles().await?)
    }

    pub async fn promote_to_admin(
        &self,
        actor_uid: &str,
        target_uid: &str,
    ) -> Result<(), AccountError> {
        self.require_admin(actor_uid).await?;
        self.require_target(target_uid).await?;
        self.profiles
            .merge_profile(target_uid, &ProfileUpdate::role(UserRole::Admin))
            .await?;
        info!(actor = actor_uid, target = target_uid, "user promoted to admin");
        Ok(())
    }

    pub async fn suspend(&self, actor_uid: &str, target_uid: &str) -> Result<(), AccountError> {
        self.set_suspended(actor_uid, target_uid, true).await
    }

    pub async fn unsuspend(&self, actor_uid: &str, target_uid: &str) -> Result<(), AccountError> {
        self.set_suspended(actor_uid, target_uid, false).await
    }

    async fn set_suspended(
        &self,
        actor_uid: &str,
        target_uid: &str,
        suspended: bool,
    ) -> Result<(), AccountError> {
        self.require_admin(actor_uid).await?;
        Self::refuse_self(actor_uid, target_uid, "suspend")?;
        self.require_target(target_uid).await?;
        self.profiles
            .merge_profile(target_uid, &ProfileUpdate::suspended(suspended))
            .await?;
        info!(actor = actor_uid, target = target_uid, suspended, "suspension changed");
        Ok(())
    }

    /// Delete the target's profile document. The identity-provider account
    /// itself is left alone.
    pub async fn delete_user(&self, actor_uid: &str, target_uid: &str) -> Result<(), AccountError> {
        self.require_admin(actor_uid).await?;
        Self::refuse_self(actor_uid, target_uid, "delete")?;
        self.require_target(target_uid).await?;
        self.profiles.delete_profile(target_uid).await?;
        info!(actor = actor_uid, target = target_uid, "user profile deleted");
        Ok(())
    }
}
