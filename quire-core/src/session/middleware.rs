//! Credential extraction for HTTP requests

use super::cookie::SessionCookie;
use http::Request;

/// Pulls the raw credential out of a request
///
/// Cookie first, then `Authorization: Bearer` when enabled. Empty values are
/// treated as absent.
#[derive(Debug, Clone)]
pub struct CredentialExtractor {
    cookie: SessionCookie,
    bearer_enabled: bool,
}

impl CredentialExtractor {
    pub fn new(cookie: SessionCookie, bearer_enabled: bool) -> Self {
        Self { cookie, bearer_enabled }
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    /// Extract the credential from request headers
    ///
    /// Priority: Cookie > Bearer token
    pub fn extract<B>(&self, req: &Request<B>) -> Option<String> {
        if let Some(credential) = self.extract_from_cookie(req) {
            log::trace!("Credential extracted from cookie");
            return Some(credential);
        }

        if self.bearer_enabled {
            if let Some(credential) = Self::extract_from_bearer(req) {
                log::trace!("Credential extracted from Bearer token");
                return Some(credential);
            }
        }

        None
    }

    fn extract_from_cookie<B>(&self, req: &Request<B>) -> Option<String> {
        req.headers()
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| self.cookie.extract_from_header(header))
    }

    fn extract_from_bearer<B>(req: &Request<B>) -> Option<String> {
        req.headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::cookie::CookieConfig;

    fn extractor(bearer: bool) -> CredentialExtractor {
        CredentialExtractor::new(SessionCookie::new(CookieConfig::default()), bearer)
    }

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/admin");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_cookie_wins_over_bearer() {
        let req = request(&[("cookie", "quire_session=from-cookie"), ("authorization", "Bearer from-header")]);
        assert_eq!(extractor(true).extract(&req), Some("from-cookie".to_string()));
    }

    #[test]
    fn test_bearer_only_when_enabled() {
        let req = request(&[("authorization", "Bearer token-1")]);
        assert_eq!(extractor(true).extract(&req), Some("token-1".to_string()));
        assert_eq!(extractor(false).extract(&req), None);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let req = request(&[("cookie", "quire_session="), ("authorization", "Bearer   ")]);
        assert_eq!(extractor(true).extract(&req), None);
        assert_eq!(extractor(true).extract(&request(&[])), None);
    }

    #[test]
    fn test_multiple_cookie_headers() {
        let req = request(&[("cookie", "theme=dark"), ("cookie", "quire_session=abc")]);
        assert_eq!(extractor(false).extract(&req), Some("abc".to_string()));
    }
}
