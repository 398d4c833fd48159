//! Client configuration: endpoint, credentials, timeout and headers.
//!
//! # Design
//! `ClientConfig` is a plain mutable record. Host changes go through
//! `endpoint::resolve` before anything is stored, so a rejected host leaves
//! the previous endpoint in place. Every instance gets its own copy of
//! `DEFAULT_HEADERS`; `set_header` on one config is never visible from
//! another.
//!
//! Requests are described, not sent: `build_request` produces an
//! `HttpRequest` for the caller's transport.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, trace};

use crate::endpoint::{self, HostPort};
use crate::error::ConfigError;
use crate::http::{HttpMethod, HttpRequest};

/// Headers every new config starts with.
pub const DEFAULT_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

/// Connection settings for a search cluster client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    host_port: HostPort,
    user: String,
    pass: String,
    timeout: Duration,
    headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Build a config from a `http(s)://host[:port]` string.
    ///
    /// `port` always wins over a port embedded in `host` (or the default).
    pub fn new(
        host: &str,
        port: u16,
        user: &str,
        pass: &str,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let mut host_port = endpoint::resolve(host)?;
        if host_port.port != port {
            debug!(parsed = host_port.port, port, "explicit port overrides host port");
            host_port.port = port;
        }

        Ok(Self {
            host_port,
            user: user.to_string(),
            pass: pass.to_string(),
            timeout: Duration::from_secs(timeout_secs),
            headers: default_headers(),
        })
    }

    /// Insert or overwrite a header sent with every request.
    ///
    /// Header names are case-insensitive: an existing entry that differs only
    /// in case is replaced, and the new spelling of `key` is kept.
    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(key));
        self.headers.insert(key.to_string(), value.to_string());
    }

    /// Base address in `scheme://host:port` form.
    pub fn http_address(&self) -> String {
        self.host_port.to_string()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Replace the endpoint. On error the current endpoint is kept.
    ///
    /// The port is taken from `value` (embedded or default), not carried
    /// over from the previous endpoint.
    pub fn set_host(&mut self, value: &str) -> Result<(), ConfigError> {
        let host_port = endpoint::resolve(value)?;
        debug!(from = %self.host_port, to = %host_port, "host changed");
        self.host_port = host_port;
        Ok(())
    }

    /// Overwrite only the port. No validation.
    pub fn set_port(&mut self, value: u16) {
        self.host_port.port = value;
    }

    pub fn set_user(&mut self, value: &str) {
        self.user = value.to_string();
    }

    pub fn set_pass(&mut self, value: &str) {
        self.pass = value.to_string();
    }

    pub fn host_port(&self) -> &HostPort {
        &self.host_port
    }

    pub fn host(&self) -> &str {
        &self.host_port.host
    }

    pub fn port(&self) -> u16 {
        self.host_port.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn pass(&self) -> &str {
        &self.pass
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// `Authorization` header value for HTTP basic auth, if a user is set.
    pub fn basic_auth(&self) -> Option<String> {
        if self.user.is_empty() {
            return None;
        }
        let token = STANDARD.encode(format!("{}:{}", self.user, self.pass));
        Some(format!("Basic {token}"))
    }

    /// Describe a request against `path` on the configured endpoint.
    ///
    /// Headers come out in key order, followed by `Authorization` when
    /// credentials are set.
    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let url = format!("{}/{}", self.http_address(), path.trim_start_matches('/'));

        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(auth) = self.basic_auth() {
            headers.push(("Authorization".to_string(), auth));
        }

        trace!(%method, %url, headers = headers.len(), "built request");
        HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: self.timeout,
        }
    }
}

// Keeps the password out of logs and panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host_port", &self.host_port)
            .field("user", &self.user)
            .field("pass", &"***")
            .field("timeout", &self.timeout)
            .field("headers", &self.headers)
            .finish()
    }
}

fn default_headers() -> BTreeMap<String, String> {
    DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ClientConfig {
        ClientConfig::new("http://example.com", 9200, "", "", 10).unwrap()
    }

    #[test]
    fn new_with_embedded_port() {
        let c = ClientConfig::new("http://example.com:9300", 9300, "", "", 10).unwrap();
        assert_eq!(c.http_address(), "http://example.com:9300");
    }

    #[test]
    fn new_without_port_uses_argument() {
        assert_eq!(config().http_address(), "http://example.com:9200");

        let c = ClientConfig::new("https://example.com", 443, "", "", 10).unwrap();
        assert_eq!(c.http_address(), "https://example.com:443");
    }

    #[test_log::test]
    fn explicit_port_overrides_embedded_port() {
        let c = ClientConfig::new("http://example.com:9300", 9201, "", "", 10).unwrap();
        assert_eq!(c.port(), 9201);
        assert_eq!(c.http_address(), "http://example.com:9201");
    }

    #[test]
    fn new_propagates_errors() {
        let err = ClientConfig::new("example.com", 9200, "", "", 10).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScheme { .. }));

        let err = ClientConfig::new("http://example.com:port", 9200, "", "", 10).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                port: "port".to_string()
            }
        );

        let err = ClientConfig::new("http://", 9200, "", "", 10).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHostFormat { .. }));
    }

    #[test]
    fn timeout_is_seconds() {
        let c = ClientConfig::new("http://example.com", 9200, "", "", 45).unwrap();
        assert_eq!(c.timeout(), Duration::from_secs(45));
    }

    #[test]
    fn default_headers_present() {
        let c = config();
        assert_eq!(c.headers().len(), 1);
        assert_eq!(c.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn set_header_keeps_content_type() {
        let mut c = config();
        c.set_header("X-Custom", "v");
        assert_eq!(c.headers()["X-Custom"], "v");
        assert_eq!(c.headers()["Content-Type"], "application/json");

        c.set_header("X-Custom", "w");
        assert_eq!(c.headers()["X-Custom"], "w");
        assert_eq!(c.headers().len(), 2);
    }

    #[test]
    fn set_header_overwrites_regardless_of_case() {
        let mut c = config();
        c.set_header("content-type", "application/x-ndjson");
        assert_eq!(c.headers().len(), 1);
        assert!(!c.headers().contains_key("Content-Type"));

        let req = c.build_request(HttpMethod::Post, "_bulk", None);
        let content_types: Vec<&str> = req
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(content_types, vec!["application/x-ndjson"]);
        assert_eq!(req.header("content-type"), Some("application/x-ndjson"));
    }

    #[test]
    fn headers_are_not_shared_between_configs() {
        let mut a = config();
        let b = config();
        a.set_header("X-Custom", "v");
        assert!(!b.headers().contains_key("X-Custom"));

        let c = config();
        assert!(!c.headers().contains_key("X-Custom"));
    }

    #[test_log::test]
    fn set_host_replaces_endpoint() {
        let mut c = ClientConfig::new("http://a.com", 9300, "", "", 10).unwrap();
        c.set_host("https://b.com:9400/ignored").unwrap();
        assert_eq!(c.http_address(), "https://b.com:9400");

        c.set_host("http://c.com").unwrap();
        assert_eq!(c.http_address(), "http://c.com:9200");
    }

    #[test]
    fn failed_set_host_keeps_previous_endpoint() {
        let mut c = ClientConfig::new("http://a.com", 9200, "", "", 10).unwrap();

        let err = c.set_host("ftp://b.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScheme { .. }));
        assert_eq!(c.http_address(), "http://a.com:9200");

        let err = c.set_host("http://b.com:x").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert_eq!(c.http_address(), "http://a.com:9200");
    }

    #[test]
    fn set_port_only_changes_port() {
        let mut c = config();
        c.set_port(9300);
        assert_eq!(c.http_address(), "http://example.com:9300");

        c.set_port(0);
        assert_eq!(c.port(), 0);
        assert_eq!(c.host(), "http://example.com");
    }

    #[test]
    fn credentials_are_overwritten() {
        let mut c = ClientConfig::new("http://example.com", 9200, "elastic", "changeme", 10).unwrap();
        assert_eq!(c.user(), "elastic");
        assert_eq!(c.pass(), "changeme");

        c.set_user("reader");
        c.set_pass("secret");
        assert_eq!(c.user(), "reader");
        assert_eq!(c.pass(), "secret");
    }

    #[test]
    fn basic_auth_requires_user() {
        assert_eq!(config().basic_auth(), None);

        let c = ClientConfig::new("http://example.com", 9200, "user", "pass", 10).unwrap();
        assert_eq!(c.basic_auth().as_deref(), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn debug_hides_password() {
        let c = ClientConfig::new("http://example.com", 9200, "user", "hunter2", 10).unwrap();
        let out = format!("{c:?}");
        assert!(!out.contains("hunter2"));
        assert!(out.contains("user"));
    }

    #[test]
    fn build_request_uses_address_headers_and_timeout() {
        let mut c = ClientConfig::new("http://example.com:9300", 9300, "user", "pass", 5).unwrap();
        c.set_header("X-Opaque-Id", "abc");

        let req = c.build_request(HttpMethod::Post, "/logs/_search", Some("{}".to_string()));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://example.com:9300/logs/_search");
        assert_eq!(
            req.headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Opaque-Id".to_string(), "abc".to_string()),
                ("Authorization".to_string(), "Basic dXNlcjpwYXNz".to_string()),
            ]
        );
        assert_eq!(req.body.as_deref(), Some("{}"));
        assert_eq!(req.timeout, Duration::from_secs(5));
    }

    #[test]
    fn build_request_without_credentials() {
        let req = config().build_request(HttpMethod::Get, "", None);
        assert_eq!(req.url, "http://example.com:9200/");
        assert_eq!(req.header("authorization"), None);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.body.is_none());
    }
}
