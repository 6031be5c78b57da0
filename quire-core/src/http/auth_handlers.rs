//! Sign-in and sign-out handlers
//!
//! Password sign-in stands in for an external identity provider: once the
//! Argon2 hash matches, a session is opened and its signed credential is set
//! as the session cookie. HTML form posts get `303` redirects; JSON clients
//! get a JSON body alongside the same cookie.

use super::pages;
use super::response::{html, json_error, json_value, see_other, Resp};
use super::route_guard::sanitize_return_to;
use crate::config::GuardConfig;
use crate::rbac::Role;
use crate::security::PasswordHasherService;
use crate::session::{Profile, ProfileStore, SessionCookie, SessionManager};
use anyhow::{Context, Result};
use http::{header, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignInResponse<'a> {
    user_id: &'a str,
    display_name: &'a str,
    role: Option<Role>,
    redirect: &'a str,
}

/// Parse an `application/x-www-form-urlencoded` string (bodies and query strings)
pub fn parse_form(input: &str) -> HashMap<String, String> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

/// Handlers for `/signin` and `/signout`
#[derive(Clone)]
pub struct AuthHandlers {
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<SessionManager>,
    cookie: SessionCookie,
    hasher: Arc<PasswordHasherService>,
    guard: GuardConfig,
}

impl AuthHandlers {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<SessionManager>,
        cookie: SessionCookie,
        guard: GuardConfig,
    ) -> Self {
        Self { profiles, sessions, cookie, hasher: Arc::new(PasswordHasherService::new()), guard }
    }

    /// `GET /signin`
    pub fn signin_form(&self, query: Option<&str>) -> Resp {
        let params = query.map(parse_form).unwrap_or_default();
        let redirect = params.get(&self.guard.redirect_param).map(String::as_str);
        html(
            StatusCode::OK,
            pages::signin(&self.guard.signin_path, &self.guard.redirect_param, redirect, None),
        )
    }

    /// `POST /signin`
    pub async fn signin(&self, content_type: Option<&str>, body: &[u8]) -> Resp {
        let json = is_json(content_type);

        let request = match self.parse_signin(json, body) {
            Ok(request) => request,
            Err(message) => {
                return if json {
                    json_error(StatusCode::BAD_REQUEST, "invalid_request", &message)
                } else {
                    html(
                        StatusCode::BAD_REQUEST,
                        pages::signin(&self.guard.signin_path, &self.guard.redirect_param, None, Some(&message)),
                    )
                };
            }
        };

        let profile = match self.authenticate(&request.username, &request.password).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                log::warn!("Failed sign-in for '{}'", request.username);
                return self.rejected(json, request.redirect.as_deref());
            }
            Err(e) => {
                log::error!("Sign-in for '{}' failed: {:#}", request.username, e);
                return if json {
                    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Sign-in is unavailable")
                } else {
                    html(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        pages::signin(
                            &self.guard.signin_path,
                            &self.guard.redirect_param,
                            request.redirect.as_deref(),
                            Some("Sign-in is unavailable, try again later"),
                        ),
                    )
                };
            }
        };

        let issued = match self.sessions.open(&profile.user_id).await {
            Ok(issued) => issued,
            Err(e) => {
                log::error!("Could not open session for '{}': {:#}", profile.user_id, e);
                return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Could not open session");
            }
        };

        let target = sanitize_return_to(request.redirect.as_deref(), &self.guard.home_path);
        let set_cookie = self.cookie.build_set_cookie(&issued.credential);
        log::info!("'{}' signed in", profile.user_id);

        if json {
            let role = profile.role.as_deref().and_then(Role::from_stored);
            let mut resp = json_value(
                StatusCode::OK,
                &SignInResponse {
                    user_id: &profile.user_id,
                    display_name: &profile.display_name,
                    role,
                    redirect: &target,
                },
            );
            if let Ok(value) = http::HeaderValue::from_str(&set_cookie) {
                resp.headers_mut().insert(header::SET_COOKIE, value);
            }
            resp
        } else {
            see_other(&target, Some(&set_cookie))
        }
    }

    /// `POST /signout`
    ///
    /// Always clears the cookie, even when the credential was already unusable.
    pub async fn signout(&self, credential: Option<&str>) -> Resp {
        if let Some(credential) = credential {
            match self.sessions.close(credential).await {
                Ok(true) => log::info!("Session signed out"),
                Ok(false) => log::debug!("Sign-out for an unknown session"),
                Err(e) => log::error!("Sign-out failed: {:#}", e),
            }
        }
        see_other(&self.guard.home_path, Some(&self.cookie.build_delete_cookie()))
    }

    fn parse_signin(&self, json: bool, body: &[u8]) -> std::result::Result<SignInRequest, String> {
        if json {
            return serde_json::from_slice(body).map_err(|e| format!("Invalid JSON body: {}", e));
        }

        let text = std::str::from_utf8(body).map_err(|_| "Form body is not UTF-8".to_string())?;
        let mut form = parse_form(text);
        let username = form.remove("username").filter(|u| !u.is_empty());
        let password = form.remove("password").filter(|p| !p.is_empty());
        match (username, password) {
            (Some(username), Some(password)) => Ok(SignInRequest {
                username,
                password,
                redirect: form.remove(&self.guard.redirect_param),
            }),
            _ => Err("Username and password are required".to_string()),
        }
    }

    /// Look up the profile and check its password hash
    ///
    /// Unknown users and accounts without a hash are `Ok(None)`, the same as a
    /// wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Profile>> {
        let profile = match self.profiles.find_profile(username).await? {
            Some(profile) => profile,
            None => return Ok(None),
        };
        let hash = match profile.password_hash.clone() {
            Some(hash) => hash,
            None => return Ok(None),
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .context("password verification task failed")?;

        match verified {
            Ok(true) => Ok(Some(profile)),
            Ok(false) => Ok(None),
            Err(e) => {
                log::error!("Stored password hash for '{}' is unusable: {}", profile.user_id, e);
                Ok(None)
            }
        }
    }

    fn rejected(&self, json: bool, redirect: Option<&str>) -> Resp {
        if json {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", INVALID_CREDENTIALS)
        } else {
            html(
                StatusCode::UNAUTHORIZED,
                pages::signin(&self.guard.signin_path, &self.guard.redirect_param, redirect, Some(INVALID_CREDENTIALS)),
            )
        }
    }
}
