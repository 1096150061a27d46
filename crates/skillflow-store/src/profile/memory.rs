use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use skillflow_common::UserProfile;

use crate::StoreError;

use super::{sort_by_name, ProfileRepository, ProfileUpdate};

/// Profiles kept in process memory.
#[derive(Default)]
pub struct MemoryProfileRepository {
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile directly, keyed by its `uid`.
    pub fn insert(&self, profile: UserProfile) {
        self.lock().insert(profile.uid.clone(), profile);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserProfile>> {
        self.profiles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.lock().get(uid).cloned())
    }

    async fn merge_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<(), StoreError> {
        let mut profiles = self.lock();
        let profile = profiles.entry(uid.to_string()).or_insert_with(|| UserProfile {
            uid: uid.to_string(),
            ..Default::default()
        });
        update.apply_to(profile);
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        let mut profiles: Vec<UserProfile> = self.lock().values().cloned().collect();
        sort_by_name(&mut profiles);
        Ok(profiles)
    }

    async fn delete_profile(&self, uid: &str) -> Result<(), StoreError> {
        self.lock().remove(uid);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillflow_common::UserRole;

    #[tokio::test]
    async fn merge_creates_then_updates() {
        let repo = MemoryProfileRepository::new();
        repo.merge_profile(
            "u1",
            &ProfileUpdate {
                display_name: Some("Ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        repo.merge_profile("u1", &ProfileUpdate::role(UserRole::Teacher))
            .await
            .unwrap();

        let profile = repo.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.display_name, "Ada");
        assert_eq!(profile.role, UserRole::Teacher);
    }

    #[tokio::test]
    async fn delete_and_list() {
        let repo = MemoryProfileRepository::new();
        for (uid, name) in [("u1", "Zed"), ("u2", "amy")] {
            repo.insert(UserProfile {
                uid: uid.into(),
                display_name: name.into(),
                ..Default::default()
            });
        }
        let names: Vec<String> = repo
            .list_profiles()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.display_name)
            .collect();
        assert_eq!(names, ["amy", "Zed"]);

        repo.delete_profile("u1").await.unwrap();
        assert!(repo.get_profile("u1").await.unwrap().is_none());
    }
}
