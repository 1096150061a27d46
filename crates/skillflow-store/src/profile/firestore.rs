use std::sync::Arc;

use async_trait::async_trait;
use skillflow_common::UserProfile;

use crate::firestore::{Document, FirestoreClient};
use crate::StoreError;

use super::{sort_by_name, ProfileRepository, ProfileUpdate};

const PROFILES: &str = "profiles";

pub struct FirestoreProfileRepository {
    client: Arc<FirestoreClient>,
}

impl FirestoreProfileRepository {
    pub fn new(client: Arc<FirestoreClient>) -> Self {
        Self { client }
    }

    fn profile_path(uid: &str) -> String {
        format!("{PROFILES}/{uid}")
    }

    fn decode(doc: &Document) -> Result<UserProfile, StoreError> {
        let mut profile: UserProfile = doc.deserialize()?;
        profile.uid = doc.id().to_string();
        Ok(profile)
    }
}

#[async_trait]
impl ProfileRepository for FirestoreProfileRepository {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        match self.client.get_document(&Self::profile_path(uid)).await? {
            Some(doc) => Self::decode(&doc).map(Some),
            None => Ok(None),
        }
    }

    async fn merge_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<(), StoreError> {
        let fields = update.to_fields()?;
        if fields.is_empty() {
            return Ok(());
        }
        self.client
            .merge_document(&Self::profile_path(uid), &fields, &[])
            .await
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        let docs = self.client.run_query("", PROFILES, None).await?;
        let mut profiles = docs.iter().map(Self::decode).collect::<Result<Vec<_>, _>>()?;
        sort_by_name(&mut profiles);
        Ok(profiles)
    }

    async fn delete_profile(&self, uid: &str) -> Result<(), StoreError> {
        self.client.delete_document(&Self::profile_path(uid)).await
    }

    fn backend_name(&self) -> &str {
        "firestore"
    }
}
