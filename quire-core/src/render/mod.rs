//! Render-level gating
//!
//! A [`Gate`] decides whether a piece of UI is shown. It starts in
//! [`GateState::Loading`], settles once the actor is resolved, and keeps that
//! answer for its lifetime. The one exception: if the observed actor signs
//! out or changes, the gate drops to [`GateState::Denied`] so no stale grant
//! survives.
//!
//! ```rust,ignore
//! let mut gate = Gate::new(Requirement::Admin);
//! gate.observe(&auth_state);
//! let nav = gate.render(|| "<a href=\"/admin\">Admin</a>".to_string(), String::new);
//! ```

mod provider;

pub use provider::{AuthProvider, AuthState};

use crate::rbac::{CapabilityQuery, Permission};

/// What a gated component needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Permission(Permission),
    Admin,
}

impl Requirement {
    pub fn is_met_by<Q: CapabilityQuery + ?Sized>(&self, query: &Q) -> bool {
        match self {
            Requirement::Permission(p) => query.has_permission(*p),
            Requirement::Admin => query.can_access_admin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Denied,
    Granted,
}

/// Pick content or fallback for a gate state
///
/// `Loading` renders the fallback, same as `Denied`.
pub fn render<T>(state: GateState, content: impl FnOnce() -> T, fallback: impl FnOnce() -> T) -> T {
    match state {
        GateState::Granted => content(),
        GateState::Loading | GateState::Denied => fallback(),
    }
}

/// A mounted gate
#[derive(Debug, Clone)]
pub struct Gate {
    requirement: Requirement,
    state: GateState,
    /// Actor the settled state was computed for
    subject: Option<String>,
}

impl Gate {
    pub fn new(requirement: Requirement) -> Self {
        Self { requirement, state: GateState::Loading, subject: None }
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Feed the latest auth state and return the resulting gate state
    pub fn observe(&mut self, auth: &AuthState) -> GateState {
        match self.state {
            GateState::Loading => {
                if !auth.loading {
                    self.state = if self.requirement.is_met_by(auth) {
                        GateState::Granted
                    } else {
                        GateState::Denied
                    };
                    self.subject = auth.actor_id().map(str::to_string);
                }
            }
            GateState::Granted | GateState::Denied => {
                if auth.actor_id() != self.subject.as_deref() {
                    if self.state == GateState::Granted {
                        log::debug!("Gate {:?} revoked: actor changed", self.requirement);
                    }
                    self.state = GateState::Denied;
                    self.subject = auth.actor_id().map(str::to_string);
                }
            }
        }
        self.state
    }

    pub fn render<T>(&self, content: impl FnOnce() -> T, fallback: impl FnOnce() -> T) -> T {
        render(self.state, content, fallback)
    }
}
