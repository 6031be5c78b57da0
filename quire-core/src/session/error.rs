//! Credential verification failures

/// Why a presented credential could not be turned into an actor
///
/// An absent credential is not an error; it resolves to an unauthenticated
/// request.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// Not `payload.signature`, bad base64 or bad claims JSON
    #[error("credential is malformed: {0}")]
    Malformed(String),

    #[error("credential signature does not match")]
    BadSignature,

    #[error("credential expired")]
    Expired,

    /// Signature is valid but the session behind it no longer exists
    #[error("session has been revoked")]
    Revoked,

    /// Session or profile store failed while resolving
    #[error("session backend failure: {0}")]
    Backend(String),
}

impl VerificationError {
    pub(crate) fn backend(err: anyhow::Error) -> Self {
        VerificationError::Backend(format!("{:#}", err))
    }

    /// Short stable name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            VerificationError::Malformed(_) => "malformed",
            VerificationError::BadSignature => "bad_signature",
            VerificationError::Expired => "expired",
            VerificationError::Revoked => "revoked",
            VerificationError::Backend(_) => "backend",
        }
    }
}
