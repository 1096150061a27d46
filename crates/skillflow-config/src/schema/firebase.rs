//! Identity provider and document store endpoints.

use serde::{Deserialize, Serialize};
use skillflow_common::ConfigError;

/// Firebase project settings shared by Auth and Firestore.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Web API key; prefer `SKILLFLOW_FIREBASE_API_KEY`.
    pub api_key: String,
    pub project_id: String,
    pub database: String,
    pub auth_base: String,
    pub firestore_base: String,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"[REDACTED]")
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("auth_base", &self.auth_base)
            .field("firestore_base", &self.firestore_base)
            .finish()
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            database: "(default)".into(),
            auth_base: "https://identitytoolkit.googleapis.com/v1".into(),
            firestore_base: "https://firestore.googleapis.com/v1".into(),
        }
    }
}

impl FirebaseConfig {
    /// Fails unless both the web API key and the project id are set.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(
                "firebase.api_key (or SKILLFLOW_FIREBASE_API_KEY)".into(),
            ));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::MissingCredential(
                "firebase.project_id (or SKILLFLOW_FIREBASE_PROJECT_ID)".into(),
            ));
        }
        Ok(())
    }
}
