//! Builds the clients and services a command needs from configuration.

use std::sync::Arc;
use std::time::Duration;

use skillflow_account::{
    AdminService, AuthService, AuthSession, IdentityToolkitClient, IdentityToolkitConfig, SignedIn,
};
use skillflow_ai::{GeminiClient, GeminiConfig, Orchestrator, Primer};
use skillflow_chat::{ChatController, PersistenceBridge};
use skillflow_common::{SkillflowError, UserContext, UserProfile};
use skillflow_config::SkillflowConfig;
use skillflow_store::{
    ChatRepository, FirestoreChatRepository, FirestoreClient, FirestoreConfig,
    FirestoreProfileRepository, MemoryChatRepository,
};
use tracing::info;

/// Uid used for the signed-in user in offline mode.
pub const OFFLINE_UID: &str = "offline";

pub struct Accounts {
    pub auth: AuthService,
    pub admin: AdminService,
}

pub struct Services {
    config: SkillflowConfig,
    chats: Arc<dyn ChatRepository>,
    accounts: Option<Accounts>,
}

impl Services {
    pub fn build(config: SkillflowConfig, offline: bool) -> Result<Self, SkillflowError> {
        if offline {
            info!("offline mode: chats are kept in memory");
            return Ok(Self {
                config,
                chats: Arc::new(MemoryChatRepository::new()),
                accounts: None,
            });
        }

        let firebase = &config.firebase;
        firebase.require_credentials()?;

        let firestore = Arc::new(FirestoreClient::new(
            FirestoreConfig::new(firebase.project_id.clone())
                .with_base_url(firebase.firestore_base.clone())
                .with_database(firebase.database.clone()),
        )?);
        let identity = IdentityToolkitClient::new(
            IdentityToolkitConfig::new(firebase.api_key.clone())
                .with_base_url(firebase.auth_base.clone()),
        )?;
        let profiles = Arc::new(FirestoreProfileRepository::new(firestore.clone()));

        let auth = AuthService::new(Arc::new(identity), profiles.clone())
            .with_token_sink(firestore.clone());
        let admin = AdminService::new(profiles);

        info!(project = %firebase.project_id, "using firebase backend");
        Ok(Self {
            chats: Arc::new(FirestoreChatRepository::new(firestore)),
            accounts: Some(Accounts { auth, admin }),
            config,
        })
    }

    pub fn config(&self) -> &SkillflowConfig {
        &self.config
    }

    pub fn is_offline(&self) -> bool {
        self.accounts.is_none()
    }

    pub fn accounts(&self) -> Result<&Accounts, SkillflowError> {
        self.accounts.as_ref().ok_or_else(|| {
            SkillflowError::Other("account commands need Firebase; run without --offline".into())
        })
    }

    /// Stand-in identity for offline mode.
    pub fn offline_user(&self) -> SignedIn {
        SignedIn {
            session: AuthSession {
                uid: OFFLINE_UID.into(),
                id_token: String::new(),
                email: String::new(),
                display_name: Some("Student".into()),
            },
            profile: UserProfile {
                uid: OFFLINE_UID.into(),
                display_name: "Student".into(),
                ..Default::default()
            },
        }
    }

    /// Orchestrator over Gemini with the configured sampling, primer and timeout.
    pub fn orchestrator(&self) -> Result<Orchestrator, SkillflowError> {
        let assistant = &self.config.assistant;
        let api_key = assistant.require_api_key()?;

        let client = GeminiClient::new(
            GeminiConfig::new(api_key)
                .with_model(assistant.model.clone())
                .with_api_base(assistant.api_base.clone())
                .with_max_tokens(assistant.max_output_tokens)
                .with_temperature(assistant.temperature)
                .with_top_k(assistant.top_k)
                .with_top_p(assistant.top_p),
        )?;

        let mut primer = Primer::default();
        if let Some(persona) = &assistant.persona {
            primer.persona = persona.clone();
        }
        if let Some(ack) = &assistant.acknowledgment {
            primer.acknowledgment = ack.clone();
        }

        Ok(Orchestrator::new(Arc::new(client))
            .with_primer(primer)
            .with_timeout(Duration::from_secs(assistant.timeout_secs)))
    }

    /// Chat controller for `user`, driven by `orchestrator`.
    pub fn chat_controller(&self, orchestrator: Orchestrator, user: &SignedIn) -> ChatController {
        ChatController::new(orchestrator, self.bridge(&user.session.uid))
            .with_user_context(UserContext::from(&user.profile))
    }

    /// Persistence bridge for `uid` with the configured write and delete modes.
    pub fn bridge(&self, uid: &str) -> PersistenceBridge {
        let persistence = &self.config.persistence;
        PersistenceBridge::new(self.chats.clone(), uid)
            .with_write_mode(persistence.write_mode)
            .with_delete_policy(persistence.delete_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillflow_common::ConfigError;

    #[test]
    fn offline_needs_no_credentials() {
        let services = Services::build(SkillflowConfig::default(), true).unwrap();
        assert!(services.is_offline());
        assert!(services.accounts().is_err());
        assert_eq!(services.offline_user().session.uid, OFFLINE_UID);
    }

    #[test]
    fn online_requires_firebase_credentials() {
        let err = Services::build(SkillflowConfig::default(), false)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SkillflowError::Config(ConfigError::MissingCredential(_))
        ));
    }

    #[test]
    fn online_builds_with_credentials() {
        let mut config = SkillflowConfig::default();
        config.firebase.api_key = "web-key".into();
        config.firebase.project_id = "demo".into();
        let services = Services::build(config, false).unwrap();
        assert!(!services.is_offline());
        assert!(services.accounts().is_ok());
    }

    #[test]
    fn orchestrator_needs_gemini_key() {
        let services = Services::build(SkillflowConfig::default(), true).unwrap();
        assert!(services.orchestrator().is_err());

        let mut config = SkillflowConfig::default();
        config.assistant.api_key = "k".into();
        config.assistant.timeout_secs = 12;
        config.assistant.acknowledgment = Some("Ready.".into());
        let services = Services::build(config, true).unwrap();
        let orchestrator = services.orchestrator().unwrap();
        assert_eq!(orchestrator.timeout(), Duration::from_secs(12));
        assert_eq!(orchestrator.primer().acknowledgment, "Ready.");
    }
}
