//! Connection configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.
//! [`OpenSearchConfigBuilder::build`] turns the raw settings into an immutable
//! descriptor: cookies are loaded and merged, auth headers are parsed.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::{self, Cookie};
use crate::error::ConfigError;

/// Default OpenSearch host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default OpenSearch port.
pub const DEFAULT_PORT: u16 = 9200;
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which transport carries requests to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The `opensearch` client with basic or certificate credentials.
    Client,
    /// A plain HTTP session carrying captured cookies and headers.
    Session,
}

impl TransportKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Session => "session",
        }
    }
}

/// Resolved, immutable connection descriptor.
#[derive(Clone)]
pub struct OpenSearchConfig {
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Basic-auth user name (empty = none).
    pub username: String,
    /// Basic-auth password (empty = none).
    pub password: String,
    /// Use `https`.
    pub use_ssl: bool,
    /// Verify server certificates.
    pub verify_certs: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// PEM file holding a client certificate and key.
    pub client_cert: Option<PathBuf>,
    /// Route requests through the cookie/header session.
    pub use_cookies: bool,
    /// Session cookies (string entries first, then file entries).
    pub cookies: Vec<Cookie>,
    /// Cookie file the cookies were partly loaded from.
    pub cookie_file: Option<PathBuf>,
    /// Extra headers attached to every request.
    pub auth_headers: Vec<(String, String)>,
}

impl OpenSearchConfig {
    /// Creates a new builder for `OpenSearchConfig`.
    #[must_use]
    pub fn builder() -> OpenSearchConfigBuilder {
        OpenSearchConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the cookie file cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().from_env().build()
    }

    /// Returns the cluster base URL, e.g. `https://search.local:9200`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    /// Returns basic-auth credentials when both parts are set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.username.is_empty() || self.password.is_empty() {
            None
        } else {
            Some((&self.username, &self.password))
        }
    }

    /// Returns the transport this configuration selects.
    #[must_use]
    pub const fn transport_kind(&self) -> TransportKind {
        if self.use_cookies {
            TransportKind::Session
        } else {
            TransportKind::Client
        }
    }

    /// Returns the `Cookie` header value, if any cookies are configured.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            None
        } else {
            Some(auth::format_cookie_header(&self.cookies))
        }
    }

    /// Returns a JSON view with secrets redacted.
    #[must_use]
    pub fn redacted(&self) -> serde_json::Value {
        let username = (!self.username.is_empty()).then_some(&self.username);
        serde_json::json!({
            "url": self.base_url(),
            "transport": self.transport_kind().as_str(),
            "username": username,
            "password_set": !self.password.is_empty(),
            "verify_certs": self.verify_certs,
            "timeout_secs": self.timeout.as_secs(),
            "client_cert": self.client_cert.as_ref().map(|p| p.display().to_string()),
            "cookies": self.cookies.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            "cookie_file": self.cookie_file.as_ref().map(|p| p.display().to_string()),
            "auth_headers": self.auth_headers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        })
    }
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            use_ssl: false,
            verify_certs: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client_cert: None,
            use_cookies: false,
            cookies: Vec::new(),
            cookie_file: None,
            auth_headers: Vec::new(),
        }
    }
}

impl fmt::Debug for OpenSearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenSearchConfig")
            .field("url", &self.base_url())
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("verify_certs", &self.verify_certs)
            .field("timeout", &self.timeout)
            .field("client_cert", &self.client_cert)
            .field("use_cookies", &self.use_cookies)
            .field(
                "cookies",
                &self.cookies.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field(
                "auth_headers",
                &self.auth_headers.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Builder for [`OpenSearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct OpenSearchConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    use_ssl: Option<bool>,
    verify_certs: Option<bool>,
    timeout: Option<Duration>,
    client_cert: Option<PathBuf>,
    use_cookies: Option<bool>,
    cookies: Option<String>,
    cookie_file: Option<PathBuf>,
    auth_headers: Option<String>,
}

/// Reads a boolean flag the way the env files spell it: only `"true"`
/// (any case) is true.
fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Reads a variable, treating an empty value as unset.
fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl OpenSearchConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.host.is_none() {
            self.host = env_non_empty("OPENSEARCH_HOST");
        }
        if self.port.is_none() {
            self.port = std::env::var("OPENSEARCH_PORT")
                .ok()
                .and_then(|v| v.trim().parse().ok());
        }
        if self.username.is_none() {
            self.username = std::env::var("OPENSEARCH_USERNAME").ok();
        }
        if self.password.is_none() {
            self.password = std::env::var("OPENSEARCH_PASSWORD").ok();
        }
        if self.use_ssl.is_none() {
            self.use_ssl = env_flag("OPENSEARCH_USE_SSL");
        }
        if self.verify_certs.is_none() {
            self.verify_certs = env_flag("OPENSEARCH_VERIFY_CERTS");
        }
        if self.timeout.is_none() {
            self.timeout = std::env::var("OPENSEARCH_TIMEOUT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs);
        }
        if self.client_cert.is_none() {
            self.client_cert = env_non_empty("OPENSEARCH_CLIENT_CERT").map(PathBuf::from);
        }
        if self.use_cookies.is_none() {
            self.use_cookies = env_flag("OPENSEARCH_USE_COOKIES");
        }
        if self.cookies.is_none() {
            self.cookies = env_non_empty("OPENSEARCH_COOKIES");
        }
        if self.cookie_file.is_none() {
            self.cookie_file = env_non_empty("OPENSEARCH_COOKIE_FILE").map(PathBuf::from);
        }
        if self.auth_headers.is_none() {
            self.auth_headers = env_non_empty("OPENSEARCH_AUTH_HEADERS");
        }
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets basic-auth credentials.
    #[must_use]
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Enables or disables `https`.
    #[must_use]
    pub const fn use_ssl(mut self, enabled: bool) -> Self {
        self.use_ssl = Some(enabled);
        self
    }

    /// Enables or disables server certificate verification.
    #[must_use]
    pub const fn verify_certs(mut self, enabled: bool) -> Self {
        self.verify_certs = Some(enabled);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the client certificate PEM path.
    #[must_use]
    pub fn client_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_cert = Some(path.into());
        self
    }

    /// Selects the cookie/header session transport.
    #[must_use]
    pub const fn use_cookies(mut self, enabled: bool) -> Self {
        self.use_cookies = Some(enabled);
        self
    }

    /// Sets the cookie string (`name=value; name2=value2`).
    #[must_use]
    pub fn cookies(mut self, cookies: impl Into<String>) -> Self {
        self.cookies = Some(cookies.into());
        self
    }

    /// Sets the cookie file path.
    #[must_use]
    pub fn cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    /// Sets the auth header string (`Name: value, Name2: value2`).
    #[must_use]
    pub fn auth_headers(mut self, headers: impl Into<String>) -> Self {
        self.auth_headers = Some(headers.into());
        self
    }

    /// Builds the [`OpenSearchConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CookieFile`] if a cookie file was set but
    /// cannot be read.
    pub fn build(self) -> Result<OpenSearchConfig, ConfigError> {
        let inline = self
            .cookies
            .as_deref()
            .map(auth::parse_cookie_string)
            .unwrap_or_default();
        let from_file = match &self.cookie_file {
            Some(path) => auth::load_cookie_file(path)?,
            None => Vec::new(),
        };

        let defaults = OpenSearchConfig::default();
        Ok(OpenSearchConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            use_ssl: self.use_ssl.unwrap_or(defaults.use_ssl),
            verify_certs: self.verify_certs.unwrap_or(defaults.verify_certs),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            client_cert: self.client_cert,
            use_cookies: self.use_cookies.unwrap_or(defaults.use_cookies),
            cookies: auth::merge_cookies(inline, from_file),
            cookie_file: self.cookie_file,
            auth_headers: self
                .auth_headers
                .as_deref()
                .map(auth::parse_auth_headers)
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_defaults() {
        let config = OpenSearchConfig::builder()
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9200);
        assert!(!config.use_ssl);
        assert!(!config.verify_certs);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.base_url(), "http://localhost:9200");
        assert_eq!(config.transport_kind(), TransportKind::Client);
        assert!(config.credentials().is_none());
        assert!(config.cookie_header().is_none());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = OpenSearchConfig::builder()
            .host("opensearch.company.com")
            .port(443)
            .use_ssl(true)
            .verify_certs(true)
            .basic_auth("admin", "secret")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.base_url(), "https://opensearch.company.com:443");
        assert_eq!(config.credentials(), Some(("admin", "secret")));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let config = OpenSearchConfig::builder()
            .basic_auth("admin", "")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_cookie_mode_resolution() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# exported\ncsrftoken=from_file\noid=user123").unwrap();

        let config = OpenSearchConfig::builder()
            .use_cookies(true)
            .cookies("sessionid=abc123; csrftoken=xyz789")
            .cookie_file(file.path())
            .auth_headers("X-Forwarded-User: john.doe")
            .build()
            .unwrap();

        assert_eq!(config.transport_kind(), TransportKind::Session);
        assert_eq!(
            config.cookie_header().as_deref(),
            Some("sessionid=abc123; csrftoken=from_file; oid=user123")
        );
        assert_eq!(
            config.auth_headers,
            vec![("X-Forwarded-User".to_string(), "john.doe".to_string())]
        );
    }

    #[test]
    fn test_repeated_inline_cookie_keeps_last_value() {
        let config = OpenSearchConfig::builder()
            .cookies("sid=old; x=1; sid=new")
            .build()
            .unwrap();
        assert_eq!(config.cookie_header().as_deref(), Some("sid=new; x=1"));
    }

    #[test]
    fn test_missing_cookie_file_fails() {
        let result = OpenSearchConfig::builder()
            .cookie_file("/nonexistent/cookies.txt")
            .build();
        assert!(matches!(result, Err(ConfigError::CookieFile { .. })));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = OpenSearchConfig::builder()
            .basic_auth("admin", "hunter2")
            .cookies("security_authentication=eyJsecret")
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("eyJsecret"));
        assert!(debug.contains("security_authentication"));

        let redacted = config.redacted().to_string();
        assert!(!redacted.contains("hunter2"));
        assert!(!redacted.contains("eyJsecret"));
    }
}
