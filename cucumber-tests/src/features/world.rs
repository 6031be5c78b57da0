use bytes::Bytes;
use cucumber::World as CucumberWorld;
use http::{header, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use quire_core::config::UserSeed;
use quire_core::http::{QuireApp, QuireServer};
use quire_core::rbac::{Actor, Permission};
use quire_core::render::{AuthProvider, Gate, Requirement};
use quire_core::security::hash_password;
use std::sync::OnceLock;

pub const TEST_PASSWORD: &str = "correct horse battery staple";
const TEST_SECRET: &str = "cucumber-quire-secret-0123456789abcdef";

/// Argon2 is slow in debug builds, hash once for every seeded account
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hash test password")).clone()
}

/// Last HTTP exchange seen by the steps
#[derive(Debug, Default, Clone)]
pub struct LastResponse {
    pub status: Option<StatusCode>,
    pub location: Option<String>,
    pub body: String,
}

#[derive(CucumberWorld)]
pub struct QuireWorld {
    /// Actor under test for capability scenarios
    pub actor: Option<Actor>,
    pub app: Option<QuireApp>,
    pub cookie: Option<String>,
    /// Cookie held before sign-out, for replay scenarios
    pub stale_cookie: Option<String>,
    pub last: LastResponse,
    pub provider: AuthProvider,
    pub gate: Option<Gate>,
}

impl std::fmt::Debug for QuireWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuireWorld")
            .field("actor", &self.actor)
            .field("app", &self.app.as_ref().map(|_| "<QuireApp>"))
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .field("last", &self.last)
            .field("provider", &self.provider.current())
            .field("gate", &self.gate)
            .finish()
    }
}

impl Default for QuireWorld {
    fn default() -> Self {
        Self {
            actor: None,
            app: None,
            cookie: None,
            stale_cookie: None,
            last: LastResponse::default(),
            provider: AuthProvider::new(),
            gate: None,
        }
    }
}

impl QuireWorld {
    /// Build a server with one account per role plus a roleless one
    pub fn start_app(&mut self) -> Result<(), String> {
        let seed = |user_id: &str, role: Option<&str>| UserSeed {
            user_id: user_id.to_string(),
            display_name: None,
            role: role.map(str::to_string),
            password_hash: Some(password_hash()),
        };

        let app = QuireServer::new()
            .with_secret(TEST_SECRET)
            .with_user(seed("ada", Some("admin")))
            .with_user(seed("eddie", Some("editor")))
            .with_user(seed("uma", Some("user")))
            .with_user(seed("nora", None))
            .build()
            .map_err(|e| format!("{:#}", e))?;
        self.app = Some(app);
        Ok(())
    }

    fn app(&self) -> &QuireApp {
        self.app.as_ref().expect("server not started, add the Background step")
    }

    pub async fn request(&mut self, method: Method, path: &str, body: &str) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.as_str());
        }
        if !body.is_empty() {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        }
        let req = builder.body(Full::new(Bytes::from(body.to_string()))).expect("valid request");

        let resp = self.app().handle(req).await;
        let status = resp.status();
        let location = resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(str::to_string);
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);

        let body = resp.into_body().collect().await.map(|c| c.to_bytes()).unwrap_or_default();

        if let Some(cookie) = set_cookie {
            // A cleared cookie has an empty value
            self.cookie = if cookie.ends_with('=') { None } else { Some(cookie) };
        }
        self.last = LastResponse { status: Some(status), location, body: String::from_utf8_lossy(&body).into_owned() };
    }

    pub async fn sign_in(&mut self, user: &str) {
        let body = format!("username={}&password={}", user, urlencoding::encode(TEST_PASSWORD));
        self.request(Method::POST, "/signin", &body).await;
        assert_eq!(self.last.status, Some(StatusCode::SEE_OTHER), "sign-in failed for {}", user);
        assert!(self.cookie.is_some(), "sign-in for {} set no cookie", user);
    }
}

/// `admin` means the admin-area requirement, anything else is a permission identifier
pub fn parse_requirement(text: &str) -> Requirement {
    match text {
        "admin" => Requirement::Admin,
        other => Requirement::Permission(
            other.parse::<Permission>().unwrap_or_else(|e| panic!("bad permission in feature file: {}", e)),
        ),
    }
}
