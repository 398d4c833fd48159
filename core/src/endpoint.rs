//! Endpoint resolution: turns `scheme://host[:port]` strings into a `HostPort`.
//!
//! # Design
//! Parsing walks the input with `split_once` / `find` instead of indexing
//! into split segments, so any shape outside `scheme://host[:port][/path]`
//! surfaces as `ConfigError::InvalidHostFormat` rather than a panic.
//!
//! The resolved host keeps its scheme prefix (`http://example.com`) because
//! callers join it with the port to form the base address of every request.
//! Ports and paths are never part of the stored host.

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;

use tracing::debug;

use crate::error::ConfigError;

/// Port used when the host string does not carry one.
pub const DEFAULT_PORT: u16 = 9200;

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// A validated host (scheme included) and port pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

impl HostPort {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for HostPort {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Check that `host` starts with `http://` or `https://`.
pub fn validate_scheme(host: &str) -> Result<(), ConfigError> {
    if SCHEMES.iter().any(|scheme| host.starts_with(scheme)) {
        return Ok(());
    }
    Err(ConfigError::InvalidScheme {
        host: host.to_string(),
    })
}

/// Extract host and port from a string that already passed `validate_scheme`.
///
/// The scheme itself is not checked again. Anything after the authority
/// (path, trailing slash) is discarded, and a missing port falls back to
/// [`DEFAULT_PORT`]. Input containing a NUL byte is malformed.
pub fn parse_host_port(host: &str) -> Result<HostPort, ConfigError> {
    let malformed = || ConfigError::InvalidHostFormat {
        host: host.to_string(),
    };

    if host.contains('\0') {
        return Err(malformed());
    }

    let (scheme, rest) = host.split_once("://").ok_or_else(malformed)?;
    let authority = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };
    if scheme.is_empty() || authority.is_empty() {
        return Err(malformed());
    }

    let (name, port_text) = split_authority(authority).ok_or_else(malformed)?;
    let port = match port_text {
        Some(text) => parse_port(text)?,
        None => DEFAULT_PORT,
    };

    Ok(HostPort {
        host: format!("{scheme}://{name}"),
        port,
    })
}

/// Validate the scheme, then parse host and port.
pub fn resolve(host: &str) -> Result<HostPort, ConfigError> {
    validate_scheme(host)?;
    let host_port = parse_host_port(host)?;
    debug!(host = %host_port.host, port = host_port.port, "resolved endpoint");
    Ok(host_port)
}

/// Split an authority into the host name and the optional port text.
///
/// Bracketed IPv6 literals keep their brackets. Returns `None` for shapes
/// that cannot be an authority (empty name, unterminated bracket, junk after
/// the closing bracket).
fn split_authority(authority: &str) -> Option<(&str, Option<&str>)> {
    if let Some(inner) = authority.strip_prefix('[') {
        let end = inner.find(']')?;
        if end == 0 {
            return None;
        }
        let name = &authority[..end + 2];
        let rest = &inner[end + 1..];
        if rest.is_empty() {
            return Some((name, None));
        }
        return rest.strip_prefix(':').map(|port| (name, Some(port)));
    }

    match authority.split_once(':') {
        Some(("", _)) => None,
        Some((name, port)) => Some((name, Some(port))),
        None => Some((authority, None)),
    }
}

fn parse_port(text: &str) -> Result<u16, ConfigError> {
    text.parse::<NonZeroU16>()
        .map(NonZeroU16::get)
        .map_err(|_| ConfigError::InvalidPort {
            port: text.to_string(),
        })
}
