//! In-memory session storage
//!
//! Sessions live in a `RwLock<HashMap>` and are lost on restart. Suitable for
//! development and single-server deployments.

use super::store::{Session, SessionStore};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory session store
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn set(&self, session: Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn touch(&self, id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(session) => {
                session.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.read().await.contains_key(id))
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        let mut sessions = self.sessions.write().await;
        let initial_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired());

        Ok(initial_count - sessions.len())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemorySessionStore::new();

        let session = Session::new("test-123", "alice", Utc::now() + Duration::hours(1));
        store.set(session.clone()).await.unwrap();

        let retrieved = store.get("test-123").await.unwrap().unwrap();
        assert_eq!(retrieved.id, "test-123");
        assert_eq!(retrieved.user_id, "alice");
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemorySessionStore::new();

        let session = Session::new("test-456", "bob", Utc::now() + Duration::hours(1));
        store.set(session).await.unwrap();
        assert!(store.exists("test-456").await.unwrap());

        store.delete("test-456").await.unwrap();
        assert!(!store.exists("test-456").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_touch_never_inserts() {
        let store = MemorySessionStore::new();

        assert!(!store.touch("missing").await.unwrap());
        assert!(!store.exists("missing").await.unwrap());

        let session = Session::new("test-789", "carol", Utc::now() + Duration::hours(1));
        let initial_access = session.last_accessed_at;
        store.set(session).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(store.touch("test-789").await.unwrap());
        assert!(store.get("test-789").await.unwrap().unwrap().last_accessed_at > initial_access);
    }

    #[tokio::test]
    async fn test_memory_store_cleanup() {
        let store = MemorySessionStore::new();

        let expired = Session::new("expired", "alice", Utc::now() - Duration::seconds(1));
        let valid = Session::new("valid", "alice", Utc::now() + Duration::hours(1));

        store.set(expired).await.unwrap();
        store.set(valid).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        let removed = store.cleanup_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count().await.unwrap(), 1);

        assert!(store.exists("valid").await.unwrap());
        assert!(!store.exists("expired").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_concurrent() {
        let store = MemorySessionStore::new();

        let mut handles = vec![];
        for i in 0..10 {
            let store_clone = store.clone();
            handles.push(tokio::spawn(async move {
                let session = Session::open(format!("user-{}", i), Duration::hours(1));
                store_clone.set(session).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 10);
    }
}
