//! Minimal HTML pages
//!
//! Every conditional fragment goes through a render [`Gate`]; pages never
//! look at roles directly.

use super::response::escape_html;
use crate::rbac::{Permission, Role};
use crate::render::{AuthState, Gate, Requirement};
use crate::session::Profile;

/// Fixed route for the sign-out form
pub const SIGNOUT_PATH: &str = "/signout";

/// Mount a gate for this render pass and pick a fragment
fn gated(requirement: Requirement, auth: &AuthState, content: impl FnOnce() -> String) -> String {
    let mut gate = Gate::new(requirement);
    gate.observe(auth);
    gate.render(content, String::new)
}

fn layout(title: &str, auth: &AuthState, signin_path: &str, body: &str) -> String {
    let admin_link = gated(Requirement::Admin, auth, || r#"<a href="/admin">Admin</a>"#.to_string());

    let session = match &auth.actor {
        Some(actor) => format!(
            r#"<span class="who">{}</span> <form method="post" action="{}" class="inline"><button type="submit">Sign out</button></form>"#,
            escape_html(&actor.display_name),
            SIGNOUT_PATH
        ),
        None => format!(r#"<a href="{}">Sign in</a>"#, escape_html(signin_path)),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Quire</title>
</head>
<body>
<nav><a href="/">Home</a> {admin_link} {session}</nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        admin_link = admin_link,
        session = session,
        body = body,
    )
}

pub fn home(auth: &AuthState, signin_path: &str) -> String {
    let greeting = match &auth.actor {
        Some(actor) => format!("<p>Signed in as {}.</p>", escape_html(&actor.display_name)),
        None => "<p>You are browsing anonymously.</p>".to_string(),
    };

    let writing = gated(Requirement::Permission(Permission::CreateContent), auth, || {
        r#"<section id="writing"><h2>Writing</h2><p>You can create and publish posts.</p></section>"#.to_string()
    });
    let moderation = gated(Requirement::Permission(Permission::ModerateComments), auth, || {
        r#"<section id="moderation"><h2>Moderation</h2><p>Comments awaiting review appear here.</p></section>"#
            .to_string()
    });

    let body = format!("<h1>Quire</h1>\n{}\n{}\n{}", greeting, writing, moderation);
    layout("Home", auth, signin_path, &body)
}

/// Sign-in form; `param` names the hidden return-to field
pub fn signin(action: &str, param: &str, redirect: Option<&str>, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(e)))
        .unwrap_or_default();
    let redirect = redirect
        .map(|r| format!(r#"<input type="hidden" name="{}" value="{}">"#, escape_html(param), escape_html(r)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Sign in</h1>
{error}
<form method="post" action="{action}">
{redirect}
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit">Sign in</button>
</form>"#,
        error = error,
        action = escape_html(action),
        redirect = redirect,
    );
    layout("Sign in", &AuthState::resolved(None), action, &body)
}

pub fn admin_dashboard(auth: &AuthState, signin_path: &str) -> String {
    let users = gated(Requirement::Permission(Permission::ViewUsers), auth, || {
        r#"<li><a href="/admin/users">Users</a></li>"#.to_string()
    });
    let settings = gated(Requirement::Permission(Permission::ManageSettings), auth, || {
        "<li>Site settings</li>".to_string()
    });
    let audit = gated(Requirement::Permission(Permission::ViewAuditLog), auth, || {
        "<li>Audit log</li>".to_string()
    });

    let body = format!("<h1>Administration</h1>\n<ul>\n{}\n{}\n{}\n</ul>", users, settings, audit);
    layout("Administration", auth, signin_path, &body)
}

pub fn admin_users(auth: &AuthState, signin_path: &str, profiles: &[Profile]) -> String {
    let role_header = gated(Requirement::Permission(Permission::AssignRoles), auth, || "<th>Role</th>".to_string());

    let rows: String = profiles
        .iter()
        .map(|profile| {
            let role_cell = gated(Requirement::Permission(Permission::AssignRoles), auth, || {
                let role = profile.role.as_deref().and_then(Role::parse_stored);
                format!("<td>{}</td>", role.map(|r| r.as_str()).unwrap_or("none"))
            });
            format!(
                "<tr><td>{}</td><td>{}</td>{}</tr>\n",
                escape_html(&profile.user_id),
                escape_html(&profile.display_name),
                role_cell
            )
        })
        .collect();

    let body = format!(
        "<h1>Users</h1>\n<table>\n<tr><th>User</th><th>Name</th>{}</tr>\n{}</table>",
        role_header, rows
    );
    layout("Users", auth, signin_path, &body)
}
