//! Route Guard - request-level protection of the admin area
//!
//! Runs before any protected handler. Every failure mode ends in a redirect:
//! - unauthenticated or unverifiable credential: to sign-in, carrying the
//!   requested path so the visitor comes back afterwards
//! - authenticated without admin access: to the neutral home page, so the
//!   response never confirms the area exists
//!
//! Example:
//! ```ignore
//! let guard = RouteGuard::new(config.guard.clone(), resolver, extractor);
//! match guard.check(&req).await {
//!     GuardDecision::Pass(actor) => handle(req, actor).await,
//!     GuardDecision::Redirect(location) => response::redirect(&location),
//! }
//! ```

use crate::config::GuardConfig;
use crate::rbac::{can_access_admin, Actor};
use crate::session::{CredentialExtractor, Resolution, SessionResolver, VerificationError};
use http::Request;
use std::future::Future;

/// Outcome of guarding one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Continue to the handler with whoever was resolved
    Pass(Option<Actor>),
    /// Stop and send the visitor to this local URL
    Redirect(String),
}

/// Request-level guard for the configured protected prefixes
#[derive(Clone)]
pub struct RouteGuard {
    config: GuardConfig,
    resolver: SessionResolver,
    extractor: CredentialExtractor,
}

impl RouteGuard {
    pub fn new(config: GuardConfig, resolver: SessionResolver, extractor: CredentialExtractor) -> Self {
        Self { config, resolver, extractor }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.config.is_protected(path)
    }

    /// Resolve the request's actor and decide whether it may proceed
    ///
    /// Unprotected paths always pass. They still carry the actor when the
    /// credential is valid, so pages can gate their own content.
    pub fn check<B>(&self, req: &Request<B>) -> impl Future<Output = GuardDecision> + Send + '_ {
        let credential = self.extractor.extract(req);
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());

        async move {
            let resolution = self.resolver.resolve(credential.as_deref()).await;
            self.decide(&path_and_query, resolution)
        }
    }

    /// Pure decision over an already-resolved credential
    pub fn decide(
        &self,
        path_and_query: &str,
        resolution: Result<Resolution, VerificationError>,
    ) -> GuardDecision {
        let path = path_and_query.split('?').next().unwrap_or(path_and_query);

        if !self.is_protected(path) {
            return GuardDecision::Pass(match resolution {
                Ok(resolution) => resolution.into_actor(),
                Err(e) => {
                    log::debug!("Ignoring unusable credential on public path {} ({})", path, e.kind());
                    None
                }
            });
        }

        match resolution {
            Ok(Resolution::Authenticated(actor)) if can_access_admin(Some(&actor)) => {
                log::trace!("Guard passed '{}' to {}", actor.id, path);
                GuardDecision::Pass(Some(actor))
            }
            Ok(Resolution::Authenticated(actor)) => {
                log::debug!("Guard sent '{}' home from {}: no admin access", actor.id, path);
                GuardDecision::Redirect(self.config.home_path.clone())
            }
            Ok(Resolution::Unauthenticated) => {
                log::debug!("Guard sent anonymous visitor to sign-in from {}", path);
                GuardDecision::Redirect(self.signin_redirect(path_and_query))
            }
            Err(e) => {
                log::warn!("Credential rejected on {} ({}): {}", path, e.kind(), e);
                GuardDecision::Redirect(self.signin_redirect(path_and_query))
            }
        }
    }

    /// `{signin}?{param}={target}` with slashes in the target left readable
    pub fn signin_redirect(&self, path_and_query: &str) -> String {
        format!(
            "{}?{}={}",
            self.config.signin_path,
            self.config.redirect_param,
            encode_return_to(path_and_query)
        )
    }
}

/// Percent-encode a return-to target, keeping `/` literal
pub fn encode_return_to(target: &str) -> String {
    urlencoding::encode(target).replace("%2F", "/")
}

/// Accept a post-sign-in target only if it stays on this site
///
/// Must be a local absolute path: starts with `/`, not `//` or `/\`, and
/// contains no control characters.
pub fn sanitize_return_to(target: Option<&str>, fallback: &str) -> String {
    match target {
        Some(t)
            if t.starts_with('/')
                && !t.starts_with("//")
                && !t.starts_with("/\\")
                && !t.chars().any(|c| c.is_control()) =>
        {
            t.to_string()
        }
        Some(t) => {
            log::debug!("Rejected off-site return target {:?}", t);
            fallback.to_string()
        }
        None => fallback.to_string(),
    }
}
