//! Sign-up, sign-in, password changes and auth-state notifications.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use skillflow_common::{UserProfile, UserRole};
use skillflow_store::{FirestoreClient, ProfileRepository, ProfileUpdate};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::identity::{AuthSession, IdentityProvider};
use crate::AccountError;

/// Bio written to every new profile.
pub const DEFAULT_BIO: &str = "This is a default bio.";

pub const MIN_PASSWORD_LEN: usize = 6;

/// Receives the bearer token whenever the signed-in user changes.
pub trait TokenSink: Send + Sync {
    fn token_changed(&self, id_token: Option<&str>);
}

impl TokenSink for FirestoreClient {
    fn token_changed(&self, id_token: Option<&str>) {
        self.set_id_token(id_token.map(str::to_string));
    }
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub display_name: String,
    pub email: String,
    /// Full number including the dialling code.
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub role: UserRole,
}

impl SignUpRequest {
    fn validate(&self) -> Result<(), AccountError> {
        let invalid = |msg: &str| -> Result<(), AccountError> {
            Err(AccountError::InvalidInput(msg.into()))
        };
        if self.display_name.trim().is_empty() {
            return invalid("Please enter your name");
        }
        if self.email.trim().is_empty() {
            return invalid("Please enter your email");
        }
        if self.phone.trim().is_empty() {
            return invalid("Please enter your phone number");
        }
        if self.password != self.confirm_password {
            return invalid("Passwords don't match. Please make sure your passwords match.");
        }
        if self.role == UserRole::Admin {
            return invalid("Choose either the student or the teacher role");
        }
        Ok(())
    }
}

/// A successful sign-up or sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: AuthSession,
    pub profile: UserProfile,
}

pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    token_sink: Option<Arc<dyn TokenSink>>,
    state: watch::Sender<Option<AuthSession>>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            provider,
            profiles,
            token_sink: None,
            state,
        }
    }

    /// Forward token changes, e.g. to the document store client.
    pub fn with_token_sink(mut self, sink: Arc<dyn TokenSink>) -> Self {
        self.token_sink = Some(sink);
        self
    }

    /// Auth-state notifications. The current value is the signed-in session.
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Option<AuthSession> {
        self.state.borrow().clone()
    }

    fn require_session(&self) -> Result<AuthSession, AccountError> {
        self.current().ok_or(AccountError::NotSignedIn)
    }

    fn publish(&self, session: Option<AuthSession>) {
        if let Some(sink) = &self.token_sink {
            sink.token_changed(session.as_ref().map(|s| s.id_token.as_str()));
        }
        self.state.send_replace(session);
    }

    /// Create the account, set its display name and write the profile.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<SignedIn, AccountError> {
        request.validate()?;

        let session = self
            .provider
            .sign_up(request.email.trim(), &request.password)
            .await?;
        let session = self
            .provider
            .update_display_name(&session, request.display_name.trim())
            .await?;
        // The profile write is authorised by the new account's token.
        self.publish(Some(session.clone()));

        let update = ProfileUpdate {
            display_name: Some(request.display_name.trim().to_string()),
            email: Some(session.email.clone()),
            role: Some(request.role),
            bio: Some(DEFAULT_BIO.to_string()),
            phone: Some(request.phone.trim().to_string()),
            created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            ..Default::default()
        };
        if let Err(e) = self.profiles.merge_profile(&session.uid, &update).await {
            warn!(uid = %session.uid, error = %e, "profile creation failed");
            return Err(e.into());
        }

        let mut profile = UserProfile {
            uid: session.uid.clone(),
            ..Default::default()
        };
        update.apply_to(&mut profile);
        info!(uid = %session.uid, role = %profile.role, "account created");
        Ok(SignedIn { session, profile })
    }

    /// Sign in and load the profile. Suspended accounts are signed straight
    /// back out.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AccountError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::InvalidInput(
                "Please enter your email and password".into(),
            ));
        }
        let session = self.provider.sign_in(email.trim(), password).await?;
        self.publish(Some(session.clone()));

        let profile = match self.profiles.get_profile(&session.uid).await {
            Ok(Some(mut profile)) => {
                profile.uid = session.uid.clone();
                profile
            }
            Ok(None) => UserProfile {
                uid: session.uid.clone(),
                display_name: session.display_name.clone().unwrap_or_default(),
                email: session.email.clone(),
                ..Default::default()
            },
            Err(e) => {
                self.publish(None);
                return Err(e.into());
            }
        };

        if profile.suspended {
            warn!(uid = %session.uid, "suspended account refused");
            self.publish(None);
            return Err(AccountError::Suspended);
        }

        info!(uid = %session.uid, role = %profile.role, "signed in");
        Ok(SignedIn { session, profile })
    }

    pub fn sign_out(&self) {
        if let Some(session) = self.current() {
            info!(uid = %session.uid, "signed out");
        }
        self.publish(None);
    }

    /// Re-authenticate with the current password, then set the new one.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AccountError> {
        let invalid = |msg: &str| -> Result<(), AccountError> {
            Err(AccountError::InvalidInput(msg.into()))
        };
        if current_password.trim().is_empty() {
            return invalid("Current password is required");
        }
        if new_password.trim().is_empty() {
            return invalid("New password is required");
        }
        if new_password != confirm_password {
            return invalid("Passwords do not match");
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return invalid("Password must be at least 6 characters");
        }

        let session = self.require_session()?;
        let fresh = self
            .provider
            .sign_in(&session.email, current_password)
            .await?;
        let updated = self.provider.update_password(&fresh, new_password).await?;
        self.publish(Some(updated));
        info!(uid = %session.uid, "password changed");
        Ok(())
    }

    /// Edit the signed-in user's own profile. A new display name is also
    /// pushed to the identity provider.
    pub async fn update_profile(&self, mut update: ProfileUpdate) -> Result<(), AccountError> {
        let session = self.require_session()?;
        // Role, suspension and email are not self-service.
        update.role = None;
        update.suspended = None;
        update.email = None;
        update.created_at = None;

        if let Some(name) = &update.display_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AccountError::InvalidInput("Name cannot be empty".into()));
            }
            let refreshed = self.provider.update_display_name(&session, &name).await?;
            self.publish(Some(refreshed));
            update.display_name = Some(name);
        }

        if update.is_empty() {
            return Ok(());
        }
        self.profiles.merge_profile(&session.uid, &update).await?;
        info!(uid = %session.uid, "profile updated");
        Ok(())
    }

    /// The signed-in user's profile.
    pub async fn profile(&self) -> Result<UserProfile, AccountError> {
        let session = self.require_session()?;
        let mut profile = self
            .profiles
            .get_profile(&session.uid)
            .await?
            .ok_or_else(|| AccountError::NotFound(session.uid.clone()))?;
        profile.uid = session.uid;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillflow_store::MemoryProfileRepository;
    use std::sync::Mutex;

    use crate::identity::MemoryIdentityProvider;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<Option<String>>>);

    impl TokenSink for RecordingSink {
        fn token_changed(&self, id_token: Option<&str>) {
            self.0.lock().unwrap().push(id_token.map(str::to_string));
        }
    }

    struct Harness {
        profiles: Arc<MemoryProfileRepository>,
        sink: Arc<RecordingSink>,
        auth: AuthService,
    }

    fn harness() -> Harness {
        let profiles = Arc::new(MemoryProfileRepository::new());
        let sink = Arc::new(RecordingSink::default());
        let auth = AuthService::new(Arc::new(MemoryIdentityProvider::new()), profiles.clone())
            .with_token_sink(sink.clone());
        Harness {
            profiles,
            sink,
            auth,
        }
    }

    fn request(role: UserRole) -> SignUpRequest {
        SignUpRequest {
            display_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "+441234567890".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            role,
        }
    }

    #[tokio::test]
    async fn sign_up_creates_profile_with_defaults() {
        let h = harness();
        let signed = h.auth.sign_up(request(UserRole::Teacher)).await.unwrap();

        let stored = h.profiles.get_profile(&signed.session.uid).await.unwrap().unwrap();
        assert_eq!(stored.display_name, "Ada Lovelace");
        assert_eq!(stored.email, "ada@example.com");
        assert_eq!(stored.role, UserRole::Teacher);
        assert_eq!(stored.bio, DEFAULT_BIO);
        assert_eq!(stored.phone, "+441234567890");
        assert!(!stored.created_at.is_empty());

        assert_eq!(signed.profile.role, UserRole::Teacher);
        assert_eq!(signed.session.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(h.auth.current().unwrap().uid, signed.session.uid);
    }

    #[tokio::test]
    async fn sign_up_validates_like_the_form() {
        let h = harness();
        let cases = [
            (SignUpRequest { display_name: " ".into(), ..request(UserRole::Student) }, "Please enter your name"),
            (SignUpRequest { email: "".into(), ..request(UserRole::Student) }, "Please enter your email"),
            (SignUpRequest { phone: "".into(), ..request(UserRole::Student) }, "Please enter your phone number"),
            (
                SignUpRequest { confirm_password: "other".into(), ..request(UserRole::Student) },
                "Passwords don't match. Please make sure your passwords match.",
            ),
        ];
        for (req, expected) in cases {
            let err = h.auth.sign_up(req).await.unwrap_err();
            assert_eq!(err, AccountError::InvalidInput(expected.into()));
        }
        assert!(h.auth.sign_up(request(UserRole::Admin)).await.is_err());
        assert!(h.auth.current().is_none());
    }

    #[tokio::test]
    async fn sign_in_loads_profile_and_notifies() {
        let h = harness();
        let created = h.auth.sign_up(request(UserRole::Student)).await.unwrap();
        h.auth.sign_out();

        let mut rx = h.auth.subscribe();
        assert!(rx.borrow_and_update().is_none());

        let signed = h.auth.sign_in("ada@example.com", "secret1").await.unwrap();
        assert_eq!(signed.profile.uid, created.session.uid);
        assert_eq!(signed.profile.display_name, "Ada Lovelace");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().uid, created.session.uid);
    }

    #[tokio::test]
    async fn suspended_users_are_refused() {
        let h = harness();
        let created = h.auth.sign_up(request(UserRole::Student)).await.unwrap();
        h.auth.sign_out();
        h.profiles
            .merge_profile(&created.session.uid, &ProfileUpdate::suspended(true))
            .await
            .unwrap();

        let err = h.auth.sign_in("ada@example.com", "secret1").await.unwrap_err();
        assert_eq!(err, AccountError::Suspended);
        assert!(h.auth.current().is_none());
        assert_eq!(h.sink.0.lock().unwrap().last().unwrap(), &None);
    }

    #[tokio::test]
    async fn sign_out_clears_token() {
        let h = harness();
        h.auth.sign_up(request(UserRole::Student)).await.unwrap();
        h.auth.sign_out();

        let tokens = h.sink.0.lock().unwrap();
        assert!(tokens.first().unwrap().is_some());
        assert!(tokens.last().unwrap().is_none());
    }

    #[tokio::test]
    async fn change_password_reauthenticates() {
        let h = harness();
        h.auth.sign_up(request(UserRole::Student)).await.unwrap();

        let err = h
            .auth
            .change_password("wrong", "newpass1", "newpass1")
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::InvalidCredentials);

        h.auth
            .change_password("secret1", "newpass1", "newpass1")
            .await
            .unwrap();
        h.auth.sign_out();
        assert!(h.auth.sign_in("ada@example.com", "newpass1").await.is_ok());
    }

    #[tokio::test]
    async fn change_password_validates_input() {
        let h = harness();
        h.auth.sign_up(request(UserRole::Student)).await.unwrap();

        let cases = [
            ("", "newpass1", "newpass1", "Current password is required"),
            ("secret1", " ", " ", "New password is required"),
            ("secret1", "newpass1", "newpass2", "Passwords do not match"),
            ("secret1", "abc", "abc", "Password must be at least 6 characters"),
        ];
        for (current, new, confirm, expected) in cases {
            let err = h.auth.change_password(current, new, confirm).await.unwrap_err();
            assert_eq!(err, AccountError::InvalidInput(expected.into()));
        }
    }

    #[tokio::test]
    async fn change_password_requires_session() {
        let h = harness();
        let err = h
            .auth
            .change_password("secret1", "newpass1", "newpass1")
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::NotSignedIn);
    }

    #[tokio::test]
    async fn update_profile_merges_own_fields_only() {
        let h = harness();
        let signed = h.auth.sign_up(request(UserRole::Student)).await.unwrap();

        h.auth
            .update_profile(ProfileUpdate {
                display_name: Some("  Ada King ".into()),
                bio: Some("Loves maths".into()),
                role: Some(UserRole::Admin),
                ..Default::default()
            })
            .await
            .unwrap();

        let profile = h.auth.profile().await.unwrap();
        assert_eq!(profile.uid, signed.session.uid);
        assert_eq!(profile.display_name, "Ada King");
        assert_eq!(profile.bio, "Loves maths");
        assert_eq!(profile.role, UserRole::Student);
        assert_eq!(h.auth.current().unwrap().display_name.as_deref(), Some("Ada King"));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let h = harness();
        h.auth.sign_up(request(UserRole::Student)).await.unwrap();
        let err = h
            .auth
            .update_profile(ProfileUpdate {
                display_name: Some("   ".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err, AccountError::InvalidInput("Name cannot be empty".into()));
    }
}
