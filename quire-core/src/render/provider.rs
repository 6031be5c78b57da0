//! Published authentication state
//!
//! An [`AuthProvider`] resolves the actor once, asynchronously, and publishes
//! the result on a `watch` channel. Gates read the latest [`AuthState`] and
//! never perform I/O themselves.

use crate::rbac::{has_permission, Actor, CapabilityQuery, Permission};
use crate::session::{Resolution, VerificationError};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Snapshot of who is signed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub loading: bool,
    pub actor: Option<Actor>,
}

impl AuthState {
    pub fn loading() -> Self {
        Self { loading: true, actor: None }
    }

    pub fn resolved(actor: Option<Actor>) -> Self {
        Self { loading: false, actor }
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor.as_ref().map(|a| a.id.as_str())
    }
}

impl CapabilityQuery for AuthState {
    /// Every check fails while loading
    fn has_permission(&self, permission: Permission) -> bool {
        !self.loading && has_permission(self.actor.as_ref(), permission)
    }

    fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Owns the authentication state for one client session
pub struct AuthProvider {
    tx: watch::Sender<AuthState>,
    started: AtomicBool,
}

impl Default for AuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider {
    /// Start in the loading state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::loading());
        Self { tx, started: AtomicBool::new(false) }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    /// Run the one-shot resolution and publish its result
    ///
    /// Later calls do nothing and return the current state. A verification
    /// failure publishes a signed-out state. A result that arrives after
    /// [`sign_out`](Self::sign_out) is dropped.
    pub async fn load<F, Fut>(&self, resolve: F) -> AuthState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Resolution, VerificationError>>,
    {
        if self.started.swap(true, Ordering::SeqCst) {
            return self.current();
        }

        let actor = match resolve().await {
            Ok(resolution) => resolution.into_actor(),
            Err(e) => {
                log::warn!("Client session could not be resolved ({}): {}", e.kind(), e);
                None
            }
        };

        // A sign-out during resolution already settled the state
        let resolved = AuthState::resolved(actor);
        self.tx.send_if_modified(|state| {
            if state.loading {
                *state = resolved;
                true
            } else {
                false
            }
        });
        self.current()
    }

    /// Publish a signed-out state
    pub fn sign_out(&self) {
        self.started.store(true, Ordering::SeqCst);
        self.tx.send_replace(AuthState::resolved(None));
    }
}
