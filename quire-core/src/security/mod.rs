//! Quire Security Module
//!
//! Password hashing used by the sign-in handler and the `hash-password`
//! command. Credential signing lives in [`crate::session`].

pub mod password;

pub use password::{hash_password, verify_password, PasswordError, PasswordHasherService};
