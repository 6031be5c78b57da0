use crate::features::world::QuireWorld;
use cucumber::{given, then, when};
use http::{Method, StatusCode};

#[given(expr = "a Quire server with seeded accounts")]
async fn given_server(world: &mut QuireWorld) {
    world.start_app().expect("server should build");
}

#[given(expr = "I am signed in as {string}")]
async fn given_signed_in(world: &mut QuireWorld, user: String) {
    world.sign_in(&user).await;
}

#[given(expr = "my session cookie is tampered with")]
async fn given_tampered_cookie(world: &mut QuireWorld) {
    let cookie = world.cookie.take().expect("no session cookie to tamper with");
    // Flip one character of the signed payload
    let (name, value) = cookie.split_once('=').expect("cookie is name=value");
    let mut chars: Vec<char> = value.chars().collect();
    chars[0] = if chars[0] == 'e' { 'f' } else { 'e' };
    world.cookie = Some(format!("{}={}", name, chars.into_iter().collect::<String>()));
}

#[when(expr = "I request {string}")]
async fn when_request(world: &mut QuireWorld, path: String) {
    world.request(Method::GET, &path, "").await;
}

#[when(expr = "I sign out")]
async fn when_sign_out(world: &mut QuireWorld) {
    world.stale_cookie = world.cookie.clone();
    world.request(Method::POST, "/signout", "").await;
}

#[when(expr = "I replay my old session cookie on {string}")]
async fn when_replay(world: &mut QuireWorld, path: String) {
    world.cookie = world.stale_cookie.clone();
    world.request(Method::GET, &path, "").await;
}

#[then(expr = "I am redirected to {string}")]
async fn then_redirected(world: &mut QuireWorld, target: String) {
    let status = world.last.status.expect("no response recorded");
    assert!(status.is_redirection(), "expected a redirect, got {}", status);
    assert_eq!(world.last.location.as_deref(), Some(target.as_str()));
}

#[then(expr = "the response status is {int}")]
async fn then_status(world: &mut QuireWorld, code: u16) {
    assert_eq!(world.last.status, Some(StatusCode::from_u16(code).expect("valid status code")));
}

#[then(expr = "the page contains {string}")]
async fn then_page_contains(world: &mut QuireWorld, text: String) {
    assert!(world.last.body.contains(&text), "page does not contain {:?}", text);
}

#[then(expr = "the page does not contain {string}")]
async fn then_page_lacks(world: &mut QuireWorld, text: String) {
    assert!(!world.last.body.contains(&text), "page unexpectedly contains {:?}", text);
}

#[then(expr = "my session cookie is cleared")]
async fn then_cookie_cleared(world: &mut QuireWorld) {
    assert!(world.cookie.is_none());
}
