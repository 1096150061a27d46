//! Process-local identity provider for offline mode and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::AccountError;

use super::{AuthSession, IdentityProvider};

struct Account {
    uid: String,
    password: String,
    display_name: Option<String>,
}

#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn session_for(email: &str, account: &Account) -> AuthSession {
        AuthSession {
            uid: account.uid.clone(),
            id_token: format!("local-{}", skillflow_common::new_correlation_id()),
            email: email.to_string(),
            display_name: account.display_name.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AccountError::InvalidInput(
                "The email address is badly formatted.".into(),
            ));
        }
        if password.chars().count() < crate::MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword(
                "Password should be at least 6 characters".into(),
            ));
        }
        let mut accounts = self.lock();
        if accounts.contains_key(&email) {
            return Err(AccountError::EmailInUse);
        }
        let account = Account {
            uid: format!("local-{}", skillflow_common::next_id()),
            password: password.to_string(),
            display_name: None,
        };
        let session = Self::session_for(&email, &account);
        accounts.insert(email, account);
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        let email = email.trim().to_lowercase();
        let accounts = self.lock();
        match accounts.get(&email) {
            Some(account) if account.password == password => Ok(Self::session_for(&email, account)),
            _ => Err(AccountError::InvalidCredentials),
        }
    }

    async fn update_display_name(
        &self,
        session: &AuthSession,
        display_name: &str,
    ) -> Result<AuthSession, AccountError> {
        let mut accounts = self.lock();
        let account = accounts
            .get_mut(&session.email)
            .ok_or(AccountError::SessionExpired)?;
        account.display_name = Some(display_name.to_string());
        Ok(AuthSession {
            display_name: account.display_name.clone(),
            ..session.clone()
        })
    }

    async fn update_password(
        &self,
        session: &AuthSession,
        new_password: &str,
    ) -> Result<AuthSession, AccountError> {
        if new_password.chars().count() < crate::MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword(
                "Password should be at least 6 characters".into(),
            ));
        }
        let mut accounts = self.lock();
        let account = accounts
            .get_mut(&session.email)
            .ok_or(AccountError::SessionExpired)?;
        account.password = new_password.to_string();
        Ok(Self::session_for(&session.email, account))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}
