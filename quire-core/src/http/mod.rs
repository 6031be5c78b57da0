//! HTTP surface built on hyper
//!
//! # Architecture
//!
//! - [`server`] - [`QuireServer`] builder and the wired [`QuireApp`]
//! - [`route_guard`] - request-level protection of the admin area
//! - [`auth_handlers`] - `/signin` and `/signout`
//! - [`pages`] - minimal HTML pages with render-gated fragments
//! - [`response`] - response helpers

pub mod auth_handlers;
pub mod pages;
pub mod response;
pub mod route_guard;
pub mod server;

pub use auth_handlers::{AuthHandlers, SignInRequest};
pub use response::Resp;
pub use route_guard::{sanitize_return_to, GuardDecision, RouteGuard};
pub use server::{QuireApp, QuireServer};
