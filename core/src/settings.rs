//! Declarative client settings, loaded from JSON or the environment.
//!
//! # Design
//! `ClientSettings` is deliberately unvalidated data. Turning it into a
//! `ClientConfig` goes through `ClientConfig::new`, so settings files get
//! exactly the same host and port checks as programmatic construction.

use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::endpoint::DEFAULT_PORT;
use crate::error::ConfigError;

pub const ENV_HOST: &str = "SEARCH_CLIENT_HOST";
pub const ENV_PORT: &str = "SEARCH_CLIENT_PORT";
pub const ENV_USER: &str = "SEARCH_CLIENT_USER";
pub const ENV_PASS: &str = "SEARCH_CLIENT_PASS";
pub const ENV_TIMEOUT_SECS: &str = "SEARCH_CLIENT_TIMEOUT_SECS";

/// Serializable description of a `ClientConfig`. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub timeout_secs: u64,
    /// Sent in addition to the default headers.
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            port: DEFAULT_PORT,
            user: String::new(),
            pass: String::new(),
            timeout_secs: 30,
            headers: BTreeMap::new(),
        }
    }
}

impl ClientSettings {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Settings(e.to_string()))
    }

    /// Read `SEARCH_CLIENT_*` variables; unset ones keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        if let Some(host) = lookup(ENV_HOST) {
            settings.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            settings.port = parse_var(ENV_PORT, &port)?;
        }
        if let Some(user) = lookup(ENV_USER) {
            settings.user = user;
        }
        if let Some(pass) = lookup(ENV_PASS) {
            settings.pass = pass;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            settings.timeout_secs = parse_var(ENV_TIMEOUT_SECS, &timeout)?;
        }
        Ok(settings)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Settings(format!("{key} is not a valid number: {value}")))
}

impl ClientConfig {
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        let mut config = ClientConfig::new(
            &settings.host,
            settings.port,
            &settings.user,
            &settings.pass,
            settings.timeout_secs,
        )?;
        for (key, value) in &settings.headers {
            config.set_header(key, value);
        }
        Ok(config)
    }
}

impl TryFrom<ClientSettings> for ClientConfig {
    type Error = ConfigError;

    fn try_from(settings: ClientSettings) -> Result<Self, Self::Error> {
        ClientConfig::from_settings(&settings)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_gives_defaults() {
        let settings = ClientSettings::from_json("{}").unwrap();
        assert_eq!(settings, ClientSettings::default());

        let config = ClientConfig::try_from(settings).unwrap();
        assert_eq!(config.http_address(), "http://localhost:9200");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn json_fields_and_extra_headers() {
        let raw = r#"{
            "host": "https://search.internal:9243",
            "port": 9243,
            "user": "elastic",
            "pass": "changeme",
            "timeout_secs": 5,
            "headers": {"X-Opaque-Id": "ingest"}
        }"#;
        let config = ClientConfig::try_from(ClientSettings::from_json(raw).unwrap()).unwrap();
        assert_eq!(config.http_address(), "https://search.internal:9243");
        assert_eq!(config.user(), "elastic");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.headers()["X-Opaque-Id"], "ingest");
        assert_eq!(config.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn malformed_json_is_a_settings_error() {
        let err = ClientSettings::from_json(r#"{"port": "nine"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn invalid_host_in_settings_is_rejected() {
        let settings = ClientSettings {
            host: "localhost:9200".to_string(),
            ..ClientSettings::default()
        };
        let err = ClientConfig::try_from(settings).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScheme { .. }));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_HOST, "http://10.0.0.5"),
            (ENV_PORT, "9300"),
            (ENV_TIMEOUT_SECS, " 12 "),
        ]);
        let settings = ClientSettings::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.host, "http://10.0.0.5");
        assert_eq!(settings.port, 9300);
        assert_eq!(settings.timeout_secs, 12);
        assert_eq!(settings.user, "");
    }

    #[test]
    fn lookup_rejects_bad_numbers() {
        let err = ClientSettings::from_lookup(|k| (k == ENV_PORT).then(|| "http".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Settings("SEARCH_CLIENT_PORT is not a valid number: http".to_string())
        );
    }

    // The only test touching the process environment, so no other test can
    // observe these variables.
    #[test]
    fn from_env_reads_and_falls_back() {
        let vars = [ENV_HOST, ENV_PORT, ENV_USER, ENV_PASS, ENV_TIMEOUT_SECS];

        env::set_var(ENV_HOST, "https://10.0.0.7:9243");
        env::set_var(ENV_PORT, "9243");
        env::set_var(ENV_USER, "elastic");
        env::set_var(ENV_PASS, "changeme");
        env::set_var(ENV_TIMEOUT_SECS, "7");
        let settings = ClientSettings::from_env();

        env::set_var(ENV_PORT, "not-a-port");
        let bad_port = ClientSettings::from_env();

        for key in vars {
            env::remove_var(key);
        }
        let defaults = ClientSettings::from_env();

        let config = ClientConfig::try_from(settings.unwrap()).unwrap();
        assert_eq!(config.http_address(), "https://10.0.0.7:9243");
        assert_eq!(config.user(), "elastic");
        assert_eq!(config.pass(), "changeme");
        assert_eq!(config.timeout(), Duration::from_secs(7));

        assert!(matches!(bad_port, Err(ConfigError::Settings(_))));
        assert_eq!(defaults.unwrap(), ClientSettings::default());
    }
}
