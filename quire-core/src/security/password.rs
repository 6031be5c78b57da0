//! Password hashing for sign-in
//!
//! Uses Argon2id (OWASP recommended). Stored hashes are PHC strings such as
//! `$argon2id$v=19$m=19456,t=2,p=1$salt$hash`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Password hasher using the Argon2id algorithm
pub struct PasswordHasherService {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasherService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherService {
    /// Default Argon2id parameters: 19 MiB memory, 2 iterations, parallelism 1
    pub fn new() -> Self {
        Self { argon2: Argon2::default() }
    }

    /// Hash a password with a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        Ok(password_hash.to_string())
    }

    /// Verify a password against a stored hash
    ///
    /// A wrong password is `Ok(false)`; only an unreadable hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

/// Password-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("invalid password hash: {0}")]
    InvalidHash(String),

    #[error("password verification failed: {0}")]
    VerificationFailed(String),
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    PasswordHasherService::new().hash_password(password)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    PasswordHasherService::new().verify_password(password, hash)
}
