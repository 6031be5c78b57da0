//! Profile records
//!
//! Profiles are owned by the document store. Resolution only reads them, so
//! the trait exposes lookups and nothing that writes a role.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stored user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    /// Raw stored role; parsed with `Role::from_stored` so unknown values fail closed
    pub role: Option<String>,
    /// Argon2 PHC string, absent for accounts that cannot sign in with a password
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

/// Read access to profile records
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Every profile, ordered by user ID
    async fn list_profiles(&self) -> Result<Vec<Profile>>;
}

#[async_trait::async_trait]
impl<P: ProfileStore + ?Sized> ProfileStore for Arc<P> {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        (**self).find_profile(user_id).await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        (**self).list_profiles().await
    }
}

/// In-memory profile store, seeded at startup
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let map = profiles.into_iter().map(|p| (p.user_id.clone(), p)).collect();
        Self { profiles: Arc::new(RwLock::new(map)) }
    }

    /// Insert or replace a profile (seeding and tests)
    pub async fn insert(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.user_id.clone(), profile);
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn find_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut profiles: Vec<Profile> = self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, role: Option<&str>) -> Profile {
        Profile {
            user_id: id.to_string(),
            display_name: id.to_uppercase(),
            role: role.map(str::to_string),
            password_hash: None,
        }
    }

    #[tokio::test]
    async fn test_find_and_list() {
        let store = MemoryProfileStore::with_profiles([profile("zoe", Some("user")), profile("ada", Some("admin"))]);

        let ada = store.find_profile("ada").await.unwrap().unwrap();
        assert_eq!(ada.role.as_deref(), Some("admin"));
        assert!(store.find_profile("nobody").await.unwrap().is_none());

        let ids: Vec<_> = store.list_profiles().await.unwrap().into_iter().map(|p| p.user_id).collect();
        assert_eq!(ids, vec!["ada", "zoe"]);
    }

    #[tokio::test]
    async fn test_insert_replaces() {
        let store = MemoryProfileStore::new();
        store.insert(profile("eve", Some("user"))).await;
        store.insert(profile("eve", Some("editor"))).await;

        let eve = store.find_profile("eve").await.unwrap().unwrap();
        assert_eq!(eve.role.as_deref(), Some("editor"));
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let mut p = profile("ada", Some("admin"));
        p.password_hash = Some("$argon2id$secret".to_string());
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("argon2"));
    }
}
