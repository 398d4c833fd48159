//! Error types for endpoint resolution and client configuration.
//!
//! # Design
//! Every failure here is caused by caller input, so each variant carries the
//! offending text and the `Display` output is meant to be shown to a user as
//! is. Nothing in this crate logs these errors; they are returned.

use thiserror::Error;

/// Errors returned when a host string or client settings cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The host does not start with `http://` or `https://`.
    #[error("host doesn't contain a valid HTTP protocol (http|https): {host}")]
    InvalidScheme { host: String },

    /// The port embedded in the host is not a number in `1..=65535`.
    #[error("invalid host:port combination, port is not a valid number: {port}")]
    InvalidPort { port: String },

    /// The host is not of the form `scheme://host[:port]`.
    #[error("host is not of the form scheme://host[:port]: {host}")]
    InvalidHostFormat { host: String },

    /// Settings could not be read from JSON or the environment.
    #[error("invalid client settings: {0}")]
    Settings(String),
}
