//! Accounts for SkillFlow: sign-up, sign-in, password changes, profile
//! edits and user administration.
//!
//! Authentication is delegated to an [`IdentityProvider`] (Identity Toolkit
//! in production); profile documents go through a
//! [`ProfileRepository`](skillflow_store::ProfileRepository).

pub mod admin;
pub mod auth;
pub mod identity;

pub use admin::AdminService;
pub use auth::{AuthService, SignUpRequest, SignedIn, TokenSink, DEFAULT_BIO, MIN_PASSWORD_LEN};
pub use identity::{
    AuthSession, IdentityProvider, IdentityToolkitClient, IdentityToolkitConfig,
    MemoryIdentityProvider,
};

use skillflow_store::StoreError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("email address already in use")]
    EmailInUse,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("weak password: {0}")]
    WeakPassword(String),

    #[error("too many attempts")]
    RateLimited,

    #[error("not signed in")]
    NotSignedIn,

    #[error("session expired")]
    SessionExpired,

    #[error("account suspended")]
    Suspended,

    #[error("admin role required")]
    Forbidden,

    #[error("no profile for user {0}")]
    NotFound(String),

    #[error("identity provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            AccountError::InvalidInput(msg) => msg.clone(),
            AccountError::EmailInUse => "An account with this email already exists.".into(),
            AccountError::InvalidCredentials => "Incorrect email or password.".into(),
            AccountError::WeakPassword(_) => {
                format!("Password must be at least {MIN_PASSWORD_LEN} characters")
            }
            AccountError::RateLimited => "Too many attempts. Please try again later.".into(),
            AccountError::NotSignedIn => "You are not logged in.".into(),
            AccountError::SessionExpired => "Your session has expired. Please log in again.".into(),
            AccountError::Suspended => "This account has been suspended.".into(),
            AccountError::Forbidden => "Only administrators can do that.".into(),
            AccountError::NotFound(_) => "User not found.".into(),
            AccountError::Provider { message, .. } => message.clone(),
            AccountError::Network(_) => {
                "Network error. Please check your internet connection.".into()
            }
            AccountError::Store(e) => e.to_string(),
        }
    }
}

impl From<AccountError> for skillflow_common::SkillflowError {
    fn from(err: AccountError) -> Self {
        skillflow_common::SkillflowError::Account(err.to_string())
    }
}
