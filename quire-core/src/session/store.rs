//! Session storage trait and types

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Server-side record of a signed-in browser
///
/// A credential is only honored while its session exists here, so deleting
/// the record revokes every credential issued for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session ID (the credential's `sid`)
    pub id: String,

    /// Identity the session was opened for (the credential's `sub`)
    pub user_id: String,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Last time a request resolved through this session
    pub last_accessed_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh random ID
    pub fn open(user_id: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            created_at: now,
            expires_at: now + ttl,
            last_accessed_at: now,
        }
    }

    pub fn new(id: impl Into<String>, user_id: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            created_at: now,
            expires_at,
            last_accessed_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Update last accessed time
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }
}

/// Session storage trait
///
/// Implement this trait to keep sessions somewhere other than process memory.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a session by ID
    async fn get(&self, id: &str) -> Result<Option<Session>>;

    /// Store a session, replacing any with the same ID
    async fn set(&self, session: Session) -> Result<()>;

    /// Delete a session by ID
    async fn delete(&self, id: &str) -> Result<()>;

    /// Record an access on an existing session
    ///
    /// Must never insert: a session deleted concurrently stays deleted.
    /// Returns `false` when no session has this ID.
    async fn touch(&self, id: &str) -> Result<bool>;

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Clean up expired sessions
    /// Returns the number of sessions deleted
    async fn cleanup_expired(&self) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}

// Implement SessionStore for Arc<S> to allow using Arc directly
#[async_trait::async_trait]
impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        (**self).get(id).await
    }

    async fn set(&self, session: Session) -> Result<()> {
        (**self).set(session).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn touch(&self, id: &str) -> Result<bool> {
        (**self).touch(id).await
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        (**self).exists(id).await
    }

    async fn cleanup_expired(&self) -> Result<usize> {
        (**self).cleanup_expired().await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::open("alice", Duration::hours(1));

        assert_eq!(session.user_id, "alice");
        assert!(!session.id.is_empty());
        assert!(!session.is_expired());
        assert_eq!(session.created_at, session.last_accessed_at);
        assert_eq!(session.expires_at - session.created_at, Duration::hours(1));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::open("alice", Duration::hours(1));
        let b = Session::open("alice", Duration::hours(1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_session_expiration() {
        let session = Session::new("test-id", "alice", Utc::now() - Duration::seconds(1));
        assert!(session.is_expired());
    }

    #[test]
    fn test_session_touch() {
        let mut session = Session::new("test-id", "alice", Utc::now() + Duration::hours(1));

        let initial_access = session.last_accessed_at;
        std::thread::sleep(std::time::Duration::from_millis(10));

        session.touch();
        assert!(session.last_accessed_at > initial_access);
    }
}
