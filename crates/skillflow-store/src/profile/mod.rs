//! Profile documents at `profiles/{uid}`.

mod firestore;
mod memory;

pub use firestore::FirestoreProfileRepository;
pub use memory::MemoryProfileRepository;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use skillflow_common::{UserProfile, UserRole};

use crate::StoreError;

/// Partial profile write. Only the fields that are set are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ProfileUpdate {
    pub fn role(role: UserRole) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn suspended(suspended: bool) -> Self {
        Self {
            suspended: Some(suspended),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn to_fields(&self) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(self).map_err(|e| StoreError::Codec(e.to_string()))? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Codec(format!("profile update encoded as {other}"))),
        }
    }

    /// Apply the set fields to an in-memory profile.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(v) = &self.display_name {
            profile.display_name = v.clone();
        }
        if let Some(v) = &self.email {
            profile.email = v.clone();
        }
        if let Some(v) = self.role {
            profile.role = v;
        }
        if let Some(v) = &self.bio {
            profile.bio = v.clone();
        }
        if let Some(v) = &self.phone {
            profile.phone = v.clone();
        }
        if let Some(v) = &self.location {
            profile.location = v.clone();
        }
        if let Some(v) = &self.department {
            profile.department = v.clone();
        }
        if let Some(v) = self.suspended {
            profile.suspended = v;
        }
        if let Some(v) = &self.created_at {
            profile.created_at = v.clone();
        }
    }
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The profile for `uid`, or `None` when no document exists.
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Merge the set fields of `update`, creating the document if needed.
    async fn merge_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<(), StoreError>;

    /// Every profile, ordered by display name.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StoreError>;

    async fn delete_profile(&self, uid: &str) -> Result<(), StoreError>;

    fn backend_name(&self) -> &str;
}

pub(crate) fn sort_by_name(profiles: &mut [UserProfile]) {
    profiles.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.uid.cmp(&b.uid))
    });
}
