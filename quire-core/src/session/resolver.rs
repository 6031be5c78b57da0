//! Session resolution
//!
//! Turns a presented credential into an [`Actor`]. This is the only place an
//! actor is built from request data.

use super::error::VerificationError;
use super::profiles::ProfileStore;
use super::signing::CredentialSigner;
use super::store::SessionStore;
use crate::rbac::{Actor, Role};
use chrono::Utc;
use std::sync::Arc;

/// Outcome of resolving a credential that passed (or was absent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unauthenticated,
    Authenticated(Actor),
}

impl Resolution {
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Resolution::Authenticated(actor) => Some(actor),
            Resolution::Unauthenticated => None,
        }
    }

    pub fn into_actor(self) -> Option<Actor> {
        match self {
            Resolution::Authenticated(actor) => Some(actor),
            Resolution::Unauthenticated => None,
        }
    }
}

/// Verifies credentials against the session store and loads profiles
#[derive(Clone)]
pub struct SessionResolver {
    signer: CredentialSigner,
    sessions: Arc<dyn SessionStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl SessionResolver {
    pub fn new(signer: CredentialSigner, sessions: Arc<dyn SessionStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { signer, sessions, profiles }
    }

    pub fn signer(&self) -> &CredentialSigner {
        &self.signer
    }

    /// Resolve an optional credential
    ///
    /// * absent or blank: `Ok(Unauthenticated)`
    /// * bad format, signature or expiry: the matching [`VerificationError`]
    /// * session deleted (signed out): `Revoked`
    /// * verified but no profile: an actor with no role
    pub async fn resolve(&self, credential: Option<&str>) -> Result<Resolution, VerificationError> {
        let credential = match credential.map(str::trim) {
            None | Some("") => return Ok(Resolution::Unauthenticated),
            Some(credential) => credential,
        };

        let claims = self.signer.verify(credential, Utc::now())?;

        let session = self
            .sessions
            .get(&claims.sid)
            .await
            .map_err(VerificationError::backend)?
            .ok_or(VerificationError::Revoked)?;

        if session.user_id != claims.sub {
            return Err(VerificationError::Revoked);
        }
        if session.is_expired() {
            return Err(VerificationError::Expired);
        }

        match self.sessions.touch(&session.id).await {
            Ok(true) => {}
            // Signed out between the read and the touch
            Ok(false) => return Err(VerificationError::Revoked),
            // Access time is advisory, resolution still succeeds
            Err(e) => log::debug!("Failed to record session access: {:#}", e),
        }

        let actor = match self.profiles.find_profile(&claims.sub).await.map_err(VerificationError::backend)? {
            Some(profile) => {
                let role = profile.role.as_deref().and_then(Role::from_stored);
                Actor::new(profile.user_id, profile.display_name, role)
            }
            None => {
                log::debug!("No profile for verified identity '{}', resolving without role", claims.sub);
                Actor::roleless(claims.sub)
            }
        };

        Ok(Resolution::Authenticated(actor))
    }
}
