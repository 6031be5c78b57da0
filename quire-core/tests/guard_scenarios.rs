//! End-to-end request guard scenarios through `QuireApp::handle`

use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use quire_core::config::UserSeed;
use quire_core::http::{QuireApp, QuireServer, Resp};
use quire_core::security::hash_password;
use quire_core::session::Profile;
use std::sync::OnceLock;

const PASSWORD: &str = "correct horse battery staple";

fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap()).clone()
}

fn seed(user_id: &str, role: Option<&str>) -> UserSeed {
    UserSeed {
        user_id: user_id.to_string(),
        display_name: None,
        role: role.map(str::to_string),
        password_hash: Some(password_hash()),
    }
}

fn app() -> QuireApp {
    QuireServer::new()
        .with_secret("guard-scenarios-secret-0123456789abcdef")
        .with_user(seed("ada", Some("admin")))
        .with_user(seed("eddie", Some("editor")))
        .with_user(seed("uma", Some("user")))
        .with_user(seed("nora", None))
        .build()
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Full<Bytes>> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Full<Bytes>> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Full::new(Bytes::from(body.to_string()))).unwrap()
}

fn location(resp: &Resp) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

async fn text(resp: Resp) -> String {
    String::from_utf8(resp.into_body().collect().await.unwrap().to_bytes().to_vec()).unwrap()
}

/// Sign in through the form and return the `name=value` cookie pair
async fn sign_in(app: &QuireApp, user: &str) -> String {
    let body = format!("username={}&password={}", user, urlencoding::encode(PASSWORD));
    let resp = app.handle(post_form("/signin", &body, None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "sign-in failed for {}", user);
    let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn unauthenticated_visitor_is_sent_to_signin() {
    let resp = app().handle(get("/admin/users", None)).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/signin?redirect=/admin/users");
}

#[tokio::test]
async fn ordinary_members_are_sent_home() {
    let app = app();
    for user in ["uma", "eddie", "nora"] {
        let cookie = sign_in(&app, user).await;
        let resp = app.handle(get("/admin/users", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{}", user);
        assert_eq!(location(&resp), "/", "{}", user);
    }
}

#[tokio::test]
async fn administrator_passes() {
    let app = app();
    let cookie = sign_in(&app, "ada").await;

    let resp = app.handle(get("/admin/users", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = text(resp).await;
    assert!(page.contains("<th>Role</th>"));
    assert!(page.contains("<td>eddie</td>"));
}

#[tokio::test]
async fn signin_returns_to_requested_page() {
    let app = app();
    let body = format!("username=ada&password={}&redirect=%2Fadmin%2Fusers", urlencoding::encode(PASSWORD));
    let resp = app.handle(post_form("/signin", &body, None)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/users");
}

#[tokio::test]
async fn signin_form_carries_redirect() {
    let resp = app().handle(get("/signin?redirect=%2Fadmin%2Fusers", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(text(resp).await.contains(r#"name="redirect" value="/admin/users""#));
}

#[tokio::test]
async fn tampered_credential_is_treated_as_unauthenticated() {
    let app = app();
    let cookie = sign_in(&app, "ada").await;
    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let resp = app.handle(get("/admin", Some(&tampered))).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/signin?redirect=/admin");
}

#[tokio::test]
async fn signed_out_credential_is_revoked() {
    let app = app();
    let cookie = sign_in(&app, "ada").await;

    let resp = app.handle(post_form("/signout", "", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = app.handle(get("/admin", Some(&cookie))).await;
    assert_eq!(location(&resp), "/signin?redirect=/admin");
}

#[tokio::test]
async fn verified_identity_without_profile_is_roleless() {
    let app = app();
    let issued = app.sessions().open("ghost").await.unwrap();
    let cookie = format!("quire_session={}", issued.credential);

    let resp = app.handle(get("/api/capabilities", Some(&cookie))).await;
    let body: serde_json::Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["actor"]["id"], "ghost");
    assert_eq!(body["role"], serde_json::Value::Null);
    assert_eq!(body["permissions"], serde_json::json!([]));

    let resp = app.handle(get("/admin", Some(&cookie))).await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn unknown_stored_role_grants_nothing() {
    let app = app();
    app.profiles()
        .insert(Profile {
            user_id: "olga".into(),
            display_name: "Olga".into(),
            role: Some("superadmin".into()),
            password_hash: None,
        })
        .await;
    let issued = app.sessions().open("olga").await.unwrap();
    let cookie = format!("quire_session={}", issued.credential);

    let resp = app.handle(get("/api/capabilities", Some(&cookie))).await;
    let body: serde_json::Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(body["permissions"], serde_json::json!([]));
    assert_eq!(body["can_access_admin"], false);

    let resp = app.handle(get("/admin/users", Some(&cookie))).await;
    assert_eq!(location(&resp), "/");
}

#[tokio::test]
async fn editor_capabilities_report() {
    let app = app();
    let cookie = sign_in(&app, "eddie").await;
    let resp = app.handle(get("/api/capabilities", Some(&cookie))).await;
    let body: serde_json::Value = serde_json::from_str(&text(resp).await).unwrap();
    assert_eq!(body["role"], "editor");
    assert_eq!(body["can_access_admin"], false);
    let permissions: Vec<&str> = body["permissions"].as_array().unwrap().iter().map(|p| p.as_str().unwrap()).collect();
    assert!(permissions.contains(&"content:publish"));
    assert!(!permissions.contains(&"users:assign_roles"));
}

#[tokio::test]
async fn prefix_match_is_segment_aware() {
    let resp = app().handle(get("/administer", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bearer_is_ignored_unless_enabled() {
    let app = app();
    let issued = app.sessions().open("ada").await.unwrap();
    let req = Request::builder()
        .uri("/admin")
        .header(header::AUTHORIZATION, format!("Bearer {}", issued.credential))
        .body(Full::new(Bytes::new()))
        .unwrap();
    let resp = app.handle(req).await;
    assert_eq!(location(&resp), "/signin?redirect=/admin");
}

#[tokio::test]
async fn home_page_gates_admin_link() {
    let app = app();
    let anonymous = text(app.handle(get("/", None)).await).await;
    assert!(!anonymous.contains(r#"href="/admin""#));

    let cookie = sign_in(&app, "ada").await;
    let admin = text(app.handle(get("/", Some(&cookie))).await).await;
    assert!(admin.contains(r#"href="/admin""#));
}
