//! Security tests for session resolution
//!
//! These tests validate that forged, replayed, expired and revoked
//! credentials never resolve to an actor.

#[cfg(test)]
mod tests {
    use super::super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    const SECRET: &str = "security-test-secret-with-enough-bytes";

    struct Harness {
        resolver: SessionResolver,
        manager: SessionManager,
        sessions: Arc<MemorySessionStore>,
    }

    fn harness() -> Harness {
        let sessions = Arc::new(MemorySessionStore::new());
        let profiles = MemoryProfileStore::with_profiles([
            Profile {
                user_id: "ada".into(),
                display_name: "Ada".into(),
                role: Some("admin".into()),
                password_hash: None,
            },
            Profile {
                user_id: "uma".into(),
                display_name: "Uma".into(),
                role: Some("user".into()),
                password_hash: None,
            },
        ]);
        let signer = CredentialSigner::new(SECRET);
        let resolver = SessionResolver::new(signer.clone(), sessions.clone(), Arc::new(profiles));
        let manager = SessionManager::with_config(
            sessions.clone(),
            signer,
            SessionManagerConfig::new().with_auto_cleanup(false),
        );
        Harness { resolver, manager, sessions }
    }

    fn split(credential: &str) -> (String, String) {
        let (payload, signature) = credential.split_once('.').unwrap();
        (payload.to_string(), signature.to_string())
    }

    #[tokio::test]
    async fn test_role_escalation_by_payload_edit_is_rejected() {
        let h = harness();
        let issued = h.manager.open("uma").await.unwrap();
        let (payload, signature) = split(&issued.credential);

        // Swap the subject for the administrator, keep the old signature
        let mut claims: Claims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(&payload).unwrap()).unwrap();
        claims.sub = "ada".into();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}", forged_payload, signature);

        assert!(matches!(h.resolver.resolve(Some(&forged)).await, Err(VerificationError::BadSignature)));
    }

    #[tokio::test]
    async fn test_signature_bit_flip_is_rejected() {
        let h = harness();
        let issued = h.manager.open("ada").await.unwrap();
        let (payload, signature) = split(&issued.credential);

        let mut raw = URL_SAFE_NO_PAD.decode(&signature).unwrap();
        raw[0] ^= 0x01;
        let tampered = format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(raw));

        assert!(matches!(h.resolver.resolve(Some(&tampered)).await, Err(VerificationError::BadSignature)));
    }

    #[tokio::test]
    async fn test_credential_signed_with_other_key_is_rejected() {
        let h = harness();
        let session = Session::open("ada", Duration::hours(1));
        let claims = Claims::new(&session.id, "ada", session.created_at, session.expires_at);
        h.sessions.set(session).await.unwrap();

        let foreign = CredentialSigner::new("attacker-controlled-secret-0123456789").issue(&claims).unwrap();
        assert!(matches!(h.resolver.resolve(Some(&foreign)).await, Err(VerificationError::BadSignature)));
    }

    #[tokio::test]
    async fn test_expired_credential_is_rejected_even_if_session_lives() {
        let h = harness();
        let session = Session::open("ada", Duration::hours(1));
        let now = Utc::now();
        let claims = Claims::new(&session.id, "ada", now - Duration::hours(2), now - Duration::hours(1));
        h.sessions.set(session).await.unwrap();

        let credential = h.resolver.signer().issue(&claims).unwrap();
        assert!(matches!(h.resolver.resolve(Some(&credential)).await, Err(VerificationError::Expired)));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let h = harness();
        let now = Utc::now();
        let session = Session::new("stale", "ada", now - Duration::seconds(1));
        let claims = Claims::new("stale", "ada", now, now + Duration::hours(1));
        h.sessions.set(session).await.unwrap();

        let credential = h.resolver.signer().issue(&claims).unwrap();
        assert!(matches!(h.resolver.resolve(Some(&credential)).await, Err(VerificationError::Expired)));
    }

    #[tokio::test]
    async fn test_signed_out_credential_is_revoked() {
        let h = harness();
        let issued = h.manager.open("ada").await.unwrap();
        assert!(h.resolver.resolve(Some(&issued.credential)).await.is_ok());

        h.manager.close(&issued.credential).await.unwrap();
        assert!(matches!(
            h.resolver.resolve(Some(&issued.credential)).await,
            Err(VerificationError::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_session_cannot_be_borrowed_by_another_identity() {
        let h = harness();
        let uma = h.manager.open("uma").await.unwrap();

        // Properly signed, but points at uma's session while claiming ada
        let claims = Claims::new(&uma.session.id, "ada", uma.session.created_at, uma.session.expires_at);
        let credential = h.resolver.signer().issue(&claims).unwrap();

        assert!(matches!(h.resolver.resolve(Some(&credential)).await, Err(VerificationError::Revoked)));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let h = harness();
        let ada = h.manager.open("ada").await.unwrap();
        let uma = h.manager.open("uma").await.unwrap();

        h.manager.close(&uma.credential).await.unwrap();

        let actor = h.resolver.resolve(Some(&ada.credential)).await.unwrap().into_actor().unwrap();
        assert!(actor.is_admin());
        assert!(h.resolver.resolve(Some(&uma.credential)).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_resolution() {
        let h = harness();
        let issued = h.manager.open("ada").await.unwrap();
        let resolver = h.resolver.clone();

        let mut handles = vec![];
        for _ in 0..10 {
            let resolver = resolver.clone();
            let credential = issued.credential.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..20 {
                    let resolution = resolver.resolve(Some(&credential)).await.unwrap();
                    assert!(resolution.actor().is_some());
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
