//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use search_client_core::{ClientConfig, ConfigError, HttpMethod, HttpRequest};

/// Opaque handle to a `ClientConfig`. C callers receive a pointer to this
/// and pass it back into every `sc_config_*` function.
pub struct FfiClientConfig {
    pub(crate) inner: ClientConfig,
}

/// Copy a Rust string into a heap-allocated C string. Interior NULs yield
/// an empty string.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
    Head = 4,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Head => FfiHttpMethod::Head,
        }
    }
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
            FfiHttpMethod::Put => HttpMethod::Put,
            FfiHttpMethod::Delete => HttpMethod::Delete,
            FfiHttpMethod::Head => HttpMethod::Head,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `sc_config_build_request`. The C caller executes the request
/// against `url`, honoring `timeout_ms`, and frees it with `sc_free_request`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub timeout_ms: u64,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let url = to_c_string(req.url);
        let body = match req.body {
            Some(b) => to_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            // Exact capacity so `sc_free_request` can rebuild the Vec from len.
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
            timeout_ms: u64::try_from(req.timeout.as_millis()).unwrap_or(u64::MAX),
        });
        Box::into_raw(ffi_req)
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiConfigResult` and `FfiStatus`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidScheme = 1,
    InvalidPort = 2,
    InvalidHostFormat = 3,
    InvalidSettings = 4,
    Panic = 5,
    NullArg = 6,
    InvalidUtf8 = 7,
}

impl From<&ConfigError> for FfiErrorCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::InvalidScheme { .. } => FfiErrorCode::InvalidScheme,
            ConfigError::InvalidPort { .. } => FfiErrorCode::InvalidPort,
            ConfigError::InvalidHostFormat { .. } => FfiErrorCode::InvalidHostFormat,
            ConfigError::Settings(_) => FfiErrorCode::InvalidSettings,
        }
    }
}

/// Outcome of an operation that only succeeds or fails (e.g. `set_host`).
///
/// On success `error_code` is `Ok` and `error_message` is null.
#[repr(C)]
pub struct FfiStatus {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
}

impl FfiStatus {
    pub(crate) fn ok() -> *mut Self {
        Box::into_raw(Box::new(FfiStatus {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: ConfigError) -> *mut Self {
        Self::failure(FfiErrorCode::from(&err), err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidUtf8, format!("argument is not valid UTF-8: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiStatus {
            error_code,
            error_message: to_c_string(msg),
        }))
    }
}

/// Result envelope for config constructors.
///
/// On success `config` is non-null and owned by the caller, who must release
/// it with `sc_config_free`; `sc_free_result` does not touch it. On failure
/// `config` is null and `error_message` describes the problem.
#[repr(C)]
pub struct FfiConfigResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub config: *mut FfiClientConfig,
}

impl FfiConfigResult {
    pub(crate) fn ok(config: ClientConfig) -> *mut Self {
        let handle = Box::into_raw(Box::new(FfiClientConfig { inner: config }));
        Box::into_raw(Box::new(FfiConfigResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            config: handle,
        }))
    }

    pub(crate) fn from_error(err: ConfigError) -> *mut Self {
        Self::failure(FfiErrorCode::from(&err), err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidUtf8, format!("argument is not valid UTF-8: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiConfigResult {
            error_code,
            error_message: to_c_string(msg),
            config: std::ptr::null_mut(),
        }))
    }
}
