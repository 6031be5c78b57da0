//! Secure cookie management for sessions

use super::SameSitePolicy;

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Cookie name
    pub name: String,

    /// Cookie domain
    pub domain: Option<String>,

    /// Cookie path
    pub path: String,

    /// Secure flag (HTTPS only)
    pub secure: bool,

    /// HttpOnly flag (no JavaScript access)
    pub http_only: bool,

    pub same_site: SameSitePolicy,

    /// Max age in seconds
    pub max_age: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "quire_session".to_string(),
            domain: None,
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSitePolicy::Lax,
            max_age: Some(86400),
        }
    }
}

/// Session cookie builder
#[derive(Debug, Clone)]
pub struct SessionCookie {
    config: CookieConfig,
}

impl SessionCookie {
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Build a Set-Cookie header value carrying `credential`
    pub fn build_set_cookie(&self, credential: &str) -> String {
        let mut parts = vec![format!("{}={}", self.config.name, credential)];

        if let Some(ref domain) = self.config.domain {
            parts.push(format!("Domain={}", domain));
        }

        parts.push(format!("Path={}", self.config.path));

        if let Some(max_age) = self.config.max_age {
            parts.push(format!("Max-Age={}", max_age));
        }

        if self.config.secure {
            parts.push("Secure".to_string());
        }

        if self.config.http_only {
            parts.push("HttpOnly".to_string());
        }

        parts.push(format!("SameSite={}", self.config.same_site.as_str()));

        parts.join("; ")
    }

    /// Build a delete cookie header (Max-Age=0)
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=; Path={}; Max-Age=0", self.config.name, self.config.path);
        if let Some(ref domain) = self.config.domain {
            cookie.push_str(&format!("; Domain={}", domain));
        }
        if self.config.http_only {
            cookie.push_str("; HttpOnly");
        }
        cookie
    }

    /// Extract the credential from a Cookie header
    ///
    /// An empty value counts as absent.
    pub fn extract_from_header(&self, cookie_header: &str) -> Option<String> {
        let prefix = format!("{}=", self.config.name);
        cookie_header.split(';').find_map(|cookie| {
            cookie
                .trim()
                .strip_prefix(&prefix)
                .filter(|value| !value.is_empty())
                .map(|value| value.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_set_cookie() {
        let config = CookieConfig {
            name: "quire_session".to_string(),
            domain: Some("example.com".to_string()),
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSitePolicy::Strict,
            max_age: Some(3600),
        };

        let cookie = SessionCookie::new(config);
        let set_cookie = cookie.build_set_cookie("abc.123");

        assert!(set_cookie.starts_with("quire_session=abc.123"));
        assert!(set_cookie.contains("Domain=example.com"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=3600"));
        assert!(set_cookie.contains("Secure"));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_extract_from_header() {
        let cookie = SessionCookie::new(CookieConfig::default());

        let header = "quire_session=abc123; other=value";
        assert_eq!(cookie.extract_from_header(header), Some("abc123".to_string()));

        let header = "other=value; quire_session=xyz789";
        assert_eq!(cookie.extract_from_header(header), Some("xyz789".to_string()));

        assert_eq!(cookie.extract_from_header("other=value"), None);
        assert_eq!(cookie.extract_from_header("quire_session="), None);
        // Name must match exactly, not as a suffix
        assert_eq!(cookie.extract_from_header("old_quire_session=abc"), None);
    }

    #[test]
    fn test_delete_cookie() {
        let cookie = SessionCookie::new(CookieConfig::default());

        let delete = cookie.build_delete_cookie();
        assert!(delete.contains("Max-Age=0"));
        assert!(delete.starts_with("quire_session=;"));
    }
}
