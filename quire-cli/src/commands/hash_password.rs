use anyhow::{bail, Result};
use quire_core::security::hash_password;

/// Hash `password` for a `[[users]]` entry in quire.toml.
pub fn run(password: &str) -> Result<String> {
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(hash_password(password)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_core::security::verify_password;

    #[test]
    fn test_hash_verifies() {
        let hash = run("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &hash).unwrap());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(run("").is_err());
    }
}
