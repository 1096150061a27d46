//! User-facing entities shared between the chat core and the account layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role stored on the profile document. Missing roles read as `Student`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "teacher" => Ok(UserRole::Teacher),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Profile document at `profiles/{uid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip)]
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    pub bio: String,
    pub suspended: bool,
    pub phone: String,
    pub location: String,
    /// Teachers only.
    pub department: String,
    /// RFC 3339 creation time, empty for profiles created elsewhere.
    pub created_at: String,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// The two profile fields the assistant uses to personalise its persona.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserContext {
    pub name: String,
    pub role: UserRole,
}

impl UserContext {
    pub fn new(name: impl Into<String>, role: UserRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Line appended to the persona prompt.
    pub fn describe(&self) -> String {
        format!("User Information: Name: {}, Role: {}", self.name, self.role)
    }
}

impl From<&UserProfile> for UserContext {
    fn from(profile: &UserProfile) -> Self {
        Self::new(profile.display_name.clone(), profile.role)
    }
}
