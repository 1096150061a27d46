//! Identity Toolkit (Firebase Auth) REST client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::AccountError;

use super::{AuthSession, IdentityProvider};

#[derive(Clone)]
pub struct IdentityToolkitConfig {
    pub api_key: String,
    pub base_url: String,
}

impl IdentityToolkitConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://identitytoolkit.googleapis.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl std::fmt::Debug for IdentityToolkitConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityToolkitConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub struct IdentityToolkitClient {
    config: IdentityToolkitConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl IdentityToolkitClient {
    pub fn new(config: IdentityToolkitConfig) -> Result<Self, AccountError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AccountError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn call(&self, method: &str, body: &Value) -> Result<AccountResponse, AccountError> {
        debug!(method, "identity toolkit request");
        let response = self
            .http
            .post(self.endpoint(method))
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AccountError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status.as_u16(), &body));
        }
        response
            .json::<AccountResponse>()
            .await
            .map_err(|e| AccountError::Provider {
                status: status.as_u16(),
                message: format!("unreadable response: {e}"),
            })
    }

    fn into_session(
        response: AccountResponse,
        fallback: Option<&AuthSession>,
        email: &str,
    ) -> Result<AuthSession, AccountError> {
        let id_token = match (response.id_token, fallback) {
            (Some(token), _) => token,
            (None, Some(previous)) => previous.id_token.clone(),
            (None, None) => {
                return Err(AccountError::Provider {
                    status: 200,
                    message: "response without idToken".into(),
                })
            }
        };
        Ok(AuthSession {
            uid: response.local_id,
            id_token,
            email: response.email.unwrap_or_else(|| email.to_string()),
            display_name: response
                .display_name
                .filter(|n| !n.is_empty())
                .or_else(|| fallback.and_then(|s| s.display_name.clone())),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response = self.call("signUp", &body).await?;
        Self::into_session(response, None, email)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response = self.call("signInWithPassword", &body).await?;
        Self::into_session(response, None, email)
    }

    async fn update_display_name(
        &self,
        session: &AuthSession,
        display_name: &str,
    ) -> Result<AuthSession, AccountError> {
        let body = json!({
            "idToken": session.id_token,
            "displayName": display_name,
            "returnSecureToken": true,
        });
        let response = self.call("update", &body).await?;
        Self::into_session(response, Some(session), &session.email)
    }

    async fn update_password(
        &self,
        session: &AuthSession,
        new_password: &str,
    ) -> Result<AuthSession, AccountError> {
        let body = json!({
            "idToken": session.id_token,
            "password": new_password,
            "returnSecureToken": true,
        });
        let response = self.call("update", &body).await?;
        Self::into_session(response, Some(session), &session.email)
    }

    fn provider_name(&self) -> &str {
        "identitytoolkit"
    }
}

/// Map an error body (`{"error":{"message":"CODE : detail"}}`) to an
/// `AccountError`.
pub(crate) fn classify_error(status: u16, body: &str) -> AccountError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_default();
    let code = message.split(" : ").next().unwrap_or_default().trim();

    match code {
        "EMAIL_EXISTS" => AccountError::EmailInUse,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AccountError::InvalidCredentials
        }
        "WEAK_PASSWORD" => AccountError::WeakPassword(message.clone()),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AccountError::RateLimited,
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => {
            AccountError::SessionExpired
        }
        "INVALID_EMAIL" => {
            AccountError::InvalidInput("The email address is badly formatted.".into())
        }
        "MISSING_PASSWORD" => AccountError::InvalidInput("Please enter your password".into()),
        _ => AccountError::Provider {
            status,
            message: if message.is_empty() {
                format!("HTTP {status}")
            } else {
                message
            },
        },
    }
}
