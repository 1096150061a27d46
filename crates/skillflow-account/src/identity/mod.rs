//! Identity provider seam and its implementations.

mod memory;
mod toolkit;

#[cfg(test)]
mod tests;

pub use memory::MemoryIdentityProvider;
pub use toolkit::{IdentityToolkitClient, IdentityToolkitConfig};

use async_trait::async_trait;

use crate::AccountError;

/// A signed-in user as seen by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub uid: String,
    /// Bearer credential for the document store.
    pub id_token: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("uid", &self.uid)
            .field("id_token", &"[REDACTED]")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Email/password authentication.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AccountError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AccountError>;

    /// Set the provider-side display name. Returns the refreshed session.
    async fn update_display_name(
        &self,
        session: &AuthSession,
        display_name: &str,
    ) -> Result<AuthSession, AccountError>;

    /// Change the password of a recently authenticated session.
    async fn update_password(
        &self,
        session: &AuthSession,
        new_password: &str,
    ) -> Result<AuthSession, AccountError>;

    fn provider_name(&self) -> &str;
}
