//! Quire HTTP server
//!
//! [`QuireServer`] collects configuration (file, environment, then builder
//! methods) and [`QuireServer::build`] wires it into a [`QuireApp`]: profile
//! store seeded from `[[users]]`, in-memory session store, session manager,
//! resolver and route guard.
//!
//! ```rust,no_run
//! use quire_core::config::QuireConfig;
//! use quire_core::http::QuireServer;
//!
//! # async fn run() -> anyhow::Result<()> {
//! QuireServer::from_config(QuireConfig::load()?)
//!     .with_port(3000)
//!     .serve()
//!     .await
//! # }
//! ```

use super::auth_handlers::AuthHandlers;
use super::pages;
use super::response::{html, json_error, json_value, method_not_allowed, redirect, Resp};
use super::route_guard::{GuardDecision, RouteGuard};
use crate::config::{QuireConfig, UserSeed};
use crate::rbac::{can_access_admin, Actor, Role};
use crate::render::AuthState;
use crate::session::{
    CredentialExtractor, CredentialSigner, MemoryProfileStore, MemorySessionStore, ProfileStore, SessionCookie,
    SessionManager, SessionResolver, SessionStore,
};
use anyhow::{Context, Result};
use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::{BodyExt, Limited};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server builder
#[derive(Debug, Clone, Default)]
pub struct QuireServer {
    config: QuireConfig,
}

impl QuireServer {
    /// Start from defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded configuration
    pub fn from_config(config: QuireConfig) -> Self {
        Self { config }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.sessions.secret = secret.into();
        self
    }

    pub fn with_user(mut self, user: UserSeed) -> Self {
        self.config.users.push(user);
        self
    }

    pub fn config(&self) -> &QuireConfig {
        &self.config
    }

    /// Validate the configuration and wire the application
    ///
    /// Must run inside a tokio runtime: the session manager starts its
    /// cleanup task here.
    pub fn build(self) -> Result<QuireApp> {
        self.config.validate().context("Invalid configuration")?;
        QuireApp::new(self.config)
    }

    /// Build and serve until the listener fails
    pub async fn serve(self) -> Result<()> {
        self.build()?.serve().await
    }
}

#[derive(Debug, Serialize)]
struct Capabilities<'a> {
    authenticated: bool,
    actor: Option<&'a Actor>,
    role: Option<Role>,
    permissions: Vec<&'static str>,
    can_access_admin: bool,
}

/// A wired server ready to handle requests
pub struct QuireApp {
    config: QuireConfig,
    profiles: Arc<MemoryProfileStore>,
    sessions: Arc<SessionManager>,
    extractor: CredentialExtractor,
    guard: RouteGuard,
    auth: AuthHandlers,
}

impl QuireApp {
    fn new(config: QuireConfig) -> Result<Self> {
        let signer = CredentialSigner::new(config.sessions.secret.as_bytes());
        let cookie = SessionCookie::new(config.sessions.cookie_config()?);
        let extractor = CredentialExtractor::new(cookie.clone(), config.sessions.bearer_enabled);

        let profiles = Arc::new(MemoryProfileStore::with_profiles(config.users.iter().map(UserSeed::to_profile)));
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let sessions = Arc::new(SessionManager::with_config(
            Arc::clone(&store),
            signer.clone(),
            config.sessions.manager_config(),
        ));

        let profile_store: Arc<dyn ProfileStore> = profiles.clone();
        let resolver = SessionResolver::new(signer, store, Arc::clone(&profile_store));
        let guard = RouteGuard::new(config.guard.clone(), resolver, extractor.clone());
        let auth = AuthHandlers::new(profile_store, Arc::clone(&sessions), cookie, config.guard.clone());

        log::debug!("Seeded {} profile(s)", config.users.len());
        Ok(Self { config, profiles, sessions, extractor, guard, auth })
    }

    pub fn config(&self) -> &QuireConfig {
        &self.config
    }

    pub fn profiles(&self) -> &Arc<MemoryProfileStore> {
        &self.profiles
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Bind and accept connections forever
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind_address();

        log::info!("Starting Quire server");
        log::info!("   ✓ Protected prefixes: {}", self.config.guard.protected_prefixes.join(", "));
        log::info!("   ✓ Seeded users: {}", self.config.users.len());
        if self.config.sessions.bearer_enabled {
            log::info!("   ⚠ Bearer credentials accepted");
        }

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        log::info!("✅ Server listening on http://{}", addr);

        let app = Arc::new(self);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let app = app.clone();

            tokio::spawn(async move {
                let io = hyper_util::rt::TokioIo::new(stream);

                let service = hyper::service::service_fn(move |req| {
                    let app = app.clone();
                    async move { app.handle_request(req).await }
                });

                if let Err(err) = hyper::server::conn::http1::Builder::new().serve_connection(io, service).await {
                    log::error!("Connection error from {}: {}", remote_addr, err);
                }
            });
        }
    }

    /// Connection-level entry point: applies the request timeout
    async fn handle_request(&self, req: Request<hyper::body::Incoming>) -> Result<Resp, Infallible> {
        let timeout = Duration::from_secs(self.config.server.request_timeout);
        let path = req.uri().path().to_string();

        match tokio::time::timeout(timeout, self.handle(req)).await {
            Ok(resp) => Ok(resp),
            Err(_) => {
                log::warn!("Request to {} timed out after {}s", path, timeout.as_secs());
                Ok(json_error(StatusCode::GATEWAY_TIMEOUT, "timeout", "Request timed out"))
            }
        }
    }

    /// Route one request
    ///
    /// Every path except `/health` goes through the route guard first.
    pub async fn handle<B>(&self, req: Request<B>) -> Resp
    where
        B: hyper::body::Body<Data = Bytes> + Send,
        B::Error: Into<BoxError>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        log::trace!("{} {}", method, path);

        if path == "/health" {
            return match method {
                Method::GET => json_value(StatusCode::OK, &serde_json::json!({ "status": "ok" })),
                _ => method_not_allowed("GET"),
            };
        }

        let actor = match self.guard.check(&req).await {
            GuardDecision::Pass(actor) => actor,
            GuardDecision::Redirect(location) => return redirect(&location),
        };
        let auth = AuthState::resolved(actor);

        if path == self.config.guard.signin_path {
            return match method {
                Method::GET => self.auth.signin_form(req.uri().query()),
                Method::POST => {
                    let content_type =
                        req.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_string);
                    match self.read_body(req).await {
                        Ok(body) => self.auth.signin(content_type.as_deref(), &body).await,
                        Err(resp) => resp,
                    }
                }
                _ => method_not_allowed("GET, POST"),
            };
        }

        match (&method, path.as_str()) {
            (&Method::GET, "/") => html(StatusCode::OK, pages::home(&auth, &self.config.guard.signin_path)),
            (&Method::POST, pages::SIGNOUT_PATH) => {
                let credential = self.extractor.extract(&req);
                self.auth.signout(credential.as_deref()).await
            }
            (&Method::GET, "/admin") => html(StatusCode::OK, pages::admin_dashboard(&auth, &self.config.guard.signin_path)),
            (&Method::GET, "/admin/users") => match self.profiles.list_profiles().await {
                Ok(profiles) => html(StatusCode::OK, pages::admin_users(&auth, &self.config.guard.signin_path, &profiles)),
                Err(e) => {
                    log::error!("Failed to list profiles: {:#}", e);
                    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Failed to list users")
                }
            },
            (&Method::GET, "/api/capabilities") => capabilities(&auth),
            (_, "/" | "/admin" | "/admin/users" | "/api/capabilities") => method_not_allowed("GET"),
            (_, pages::SIGNOUT_PATH) => method_not_allowed("POST"),
            _ => json_error(StatusCode::NOT_FOUND, "not_found", &format!("No route for {}", path)),
        }
    }

    /// Collect the body, refusing anything over `max_body_size`
    async fn read_body<B>(&self, req: Request<B>) -> std::result::Result<Bytes, Resp>
    where
        B: hyper::body::Body<Data = Bytes> + Send,
        B::Error: Into<BoxError>,
    {
        let limit = self.config.server.max_body_size;
        match Limited::new(req.into_body(), limit).collect().await {
            Ok(collected) => Ok(collected.to_bytes()),
            Err(e) => {
                log::debug!("Rejected request body: {}", e);
                Err(json_error(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "payload_too_large",
                    &format!("Request body exceeds {} bytes", limit),
                ))
            }
        }
    }
}

/// `GET /api/capabilities` for whoever the request resolved to
fn capabilities(auth: &AuthState) -> Resp {
    let actor = auth.actor.as_ref();
    let permissions = actor.map(|a| a.permissions().identifiers()).unwrap_or_default();
    json_value(
        StatusCode::OK,
        &Capabilities {
            authenticated: actor.is_some(),
            actor,
            role: actor.and_then(|a| a.role),
            permissions,
            can_access_admin: can_access_admin(actor),
        },
    )
}
