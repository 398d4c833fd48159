//! Configuration core for a search cluster HTTP client.
//!
//! # Overview
//! Validates and normalizes a user-supplied endpoint (`http(s)://host[:port]`,
//! default port 9200), stores basic-auth credentials, a request timeout and
//! per-instance headers, and describes requests as plain `HttpRequest`
//! values. The caller executes the actual HTTP round-trip (host-does-IO).
//!
//! # Design
//! - `endpoint` owns all string parsing; `ClientConfig` only stores results.
//! - Mutations validate before they write, so a failed `set_host` never
//!   leaves a half-updated config behind.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod settings;

pub use config::{ClientConfig, DEFAULT_HEADERS};
pub use endpoint::{parse_host_port, resolve, validate_scheme, HostPort, DEFAULT_PORT};
pub use error::ConfigError;
pub use http::{HttpMethod, HttpRequest};
pub use settings::ClientSettings;
