//! Session manager with automatic cleanup and lifecycle management
//!
//! Wraps a [`SessionStore`], opens and closes sessions for sign-in and
//! sign-out, and purges expired records in the background.

use super::signing::{Claims, CredentialSigner};
use super::{Session, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Session manager configuration
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// Enable automatic cleanup of expired sessions
    pub auto_cleanup: bool,

    /// Interval between cleanup runs
    pub cleanup_interval: Duration,

    /// Lifetime of a new session (and of the credential issued for it)
    pub max_age: Duration,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            auto_cleanup: true,
            cleanup_interval: Duration::from_secs(300),
            max_age: Duration::from_secs(86400),
        }
    }
}

impl SessionManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_cleanup(mut self, enabled: bool) -> Self {
        self.auto_cleanup = enabled;
        self
    }

    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }
}

/// A freshly opened session and the credential that refers to it
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: Session,
    pub credential: String,
}

/// Session manager that handles session lifecycle
///
/// Must be created inside a tokio runtime when `auto_cleanup` is on.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signer: CredentialSigner,
    cleanup_task: Option<tokio::task::JoinHandle<()>>,
    config: SessionManagerConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, signer: CredentialSigner) -> Self {
        Self::with_config(store, signer, SessionManagerConfig::default())
    }

    pub fn with_config(store: Arc<dyn SessionStore>, signer: CredentialSigner, config: SessionManagerConfig) -> Self {
        let cleanup_task = if config.auto_cleanup {
            let cleanup_store = Arc::clone(&store);
            let interval = config.cleanup_interval;

            Some(tokio::spawn(async move {
                let mut interval_timer = tokio::time::interval(interval);
                loop {
                    interval_timer.tick().await;

                    match cleanup_store.cleanup_expired().await {
                        Ok(count) if count > 0 => {
                            log::info!("Auto-cleaned {} expired sessions", count);
                        }
                        Ok(_) => {}
                        Err(e) => {
                            log::error!("Session cleanup failed: {:#}", e);
                        }
                    }
                }
            }))
        } else {
            None
        };

        Self { store, signer, cleanup_task, config }
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &SessionManagerConfig {
        &self.config
    }

    /// Open a session for a verified identity and sign a credential for it
    pub async fn open(&self, user_id: &str) -> Result<IssuedSession> {
        let ttl = chrono::Duration::from_std(self.config.max_age).context("session max_age out of range")?;
        let session = Session::open(user_id, ttl);
        let claims = Claims::new(&session.id, user_id, session.created_at, session.expires_at);
        let credential = self.signer.issue(&claims).context("failed to sign session credential")?;

        self.store.set(session.clone()).await.context("failed to store session")?;
        log::debug!("Opened session {} for '{}'", session.id, user_id);

        Ok(IssuedSession { session, credential })
    }

    /// Revoke the session behind `credential`
    ///
    /// Only the signature is required to be valid; an expired credential may
    /// still sign out. Returns whether a session was found.
    pub async fn close(&self, credential: &str) -> Result<bool> {
        let sid = match self.signer.verify(credential, chrono::DateTime::<chrono::Utc>::MIN_UTC) {
            Ok(claims) => claims.sid,
            Err(e) => {
                log::debug!("Sign-out with unusable credential ({})", e.kind());
                return Ok(false);
            }
        };

        let existed = self.store.exists(&sid).await?;
        self.store.delete(&sid).await?;
        Ok(existed)
    }

    /// Manually trigger a cleanup (in addition to automatic cleanup)
    pub async fn cleanup_now(&self) -> Result<usize> {
        self.store.cleanup_expired().await
    }

    pub async fn session_count(&self) -> Result<usize> {
        self.store.count().await
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if let Some(task) = self.cleanup_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use chrono::{Duration as ChronoDuration, Utc};

    fn manager(config: SessionManagerConfig) -> SessionManager {
        SessionManager::with_config(
            Arc::new(MemorySessionStore::new()),
            CredentialSigner::new("manager-test-secret-at-least-32-bytes"),
            config,
        )
    }

    #[tokio::test]
    async fn test_manager_creation() {
        let manager = manager(SessionManagerConfig::default());
        assert!(manager.config().auto_cleanup);
        assert_eq!(manager.config().cleanup_interval, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_open_and_close() {
        let manager = manager(SessionManagerConfig::new().with_auto_cleanup(false));

        let issued = manager.open("alice").await.unwrap();
        assert_eq!(issued.session.user_id, "alice");
        assert_eq!(manager.session_count().await.unwrap(), 1);

        assert!(manager.close(&issued.credential).await.unwrap());
        assert_eq!(manager.session_count().await.unwrap(), 0);
        // Second sign-out is a no-op
        assert!(!manager.close(&issued.credential).await.unwrap());
    }

    #[tokio::test]
    async fn test_close_ignores_forged_credential() {
        let manager = manager(SessionManagerConfig::new().with_auto_cleanup(false));
        manager.open("alice").await.unwrap();

        assert!(!manager.close("forged.credential").await.unwrap());
        assert_eq!(manager.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_manual_cleanup() {
        let manager = manager(SessionManagerConfig::new().with_auto_cleanup(false));
        let store = manager.store();

        store.set(Session::new("expired", "a", Utc::now() - ChronoDuration::seconds(1))).await.unwrap();
        store.set(Session::new("valid", "a", Utc::now() + ChronoDuration::hours(1))).await.unwrap();

        assert_eq!(manager.cleanup_now().await.unwrap(), 1);
        assert!(store.exists("valid").await.unwrap());
        assert!(!store.exists("expired").await.unwrap());
    }

    #[tokio::test]
    async fn test_auto_cleanup_runs() {
        let manager = manager(
            SessionManagerConfig::new().with_cleanup_interval(Duration::from_millis(20)),
        );
        manager
            .store()
            .set(Session::new("expired", "a", Utc::now() - ChronoDuration::seconds(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(manager.session_count().await.unwrap(), 0);
    }
}
