//! Signed session credentials
//!
//! Format: `base64url(claims_json) "." base64url(hmac_sha256(key, first_part))`,
//! both parts unpadded. The signature covers the encoded payload bytes exactly
//! as they appear on the wire.

use super::error::VerificationError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Session ID in the session store
    pub sid: String,
    /// Verified identity
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(sid: impl Into<String>, sub: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sid: sid.into(),
            sub: sub.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Issues and verifies credentials with a shared secret
#[derive(Clone)]
pub struct CredentialSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSigner").field("key", &"<redacted>").finish()
    }
}

impl CredentialSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self { key: secret.as_ref().to_vec() }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any size")
    }

    /// Produce a credential for `claims`
    pub fn issue(&self, claims: &Claims) -> Result<String, VerificationError> {
        let json =
            serde_json::to_vec(claims).map_err(|e| VerificationError::Malformed(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Check signature and expiry, returning the claims
    ///
    /// The signature is compared in constant time and checked before the
    /// payload is parsed, so unsigned input never reaches the JSON decoder.
    pub fn verify(&self, credential: &str, now: DateTime<Utc>) -> Result<Claims, VerificationError> {
        let (payload, signature) = credential
            .split_once('.')
            .ok_or_else(|| VerificationError::Malformed("missing signature separator".into()))?;

        if payload.is_empty() || signature.is_empty() || signature.contains('.') {
            return Err(VerificationError::Malformed("expected exactly two parts".into()));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| VerificationError::Malformed(format!("signature: {}", e)))?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| VerificationError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| VerificationError::Malformed(format!("payload: {}", e)))?;
        let claims: Claims = serde_json::from_slice(&json)
            .map_err(|e| VerificationError::Malformed(format!("claims: {}", e)))?;

        if claims.is_expired_at(now) {
            return Err(VerificationError::Expired);
        }

        Ok(claims)
    }
}
