//! C-ABI wrapper around `search-client-core`.
//!
//! # Overview
//! Exposes `ClientConfig` through `extern "C"` functions so any language
//! with a C FFI can validate endpoints, keep credentials and headers, and
//! obtain ready-to-execute request descriptions.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Fallible operations return an envelope (`FfiConfigResult`, `FfiStatus`)
//!   carrying an `FfiErrorCode` and a human-readable message.
//! - The C caller owns all returned pointers and must call the matching
//!   `sc_free_*` / `sc_config_free` function to release them.
//! - Null string arguments that are optional in spirit (credentials, body)
//!   are read as empty / absent; a null host or config is reported.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use search_client_core::{ClientConfig, ClientSettings};

use types::*;

/// A C string argument after decoding.
enum CArg<'a> {
    Null,
    NotUtf8,
    Str(&'a str),
}

fn read_arg<'a>(ptr: *const c_char) -> CArg<'a> {
    if ptr.is_null() {
        return CArg::Null;
    }
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => CArg::Str(s),
        Err(_) => CArg::NotUtf8,
    }
}

/// Borrow a C string as `&str`. Null and invalid UTF-8 both yield `None`.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    match read_arg(ptr) {
        CArg::Str(s) => Some(s),
        CArg::Null | CArg::NotUtf8 => None,
    }
}

// ---------------------------------------------------------------------------
// Config lifecycle
// ---------------------------------------------------------------------------

/// Create a config from `host`, overriding its port with `port`.
///
/// `user` and `pass` may be null (treated as empty). Any argument that is
/// not valid UTF-8 is reported as `InvalidUtf8`. The caller must free
/// the result with `sc_free_result` and, on success, the config with
/// `sc_config_free`.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_new(
    host: *const c_char,
    port: u16,
    user: *const c_char,
    pass: *const c_char,
    timeout_secs: u64,
) -> *mut FfiConfigResult {
    catch_unwind(|| {
        let host = match read_arg(host) {
            CArg::Str(host) => host,
            CArg::Null => return FfiConfigResult::null_arg("host"),
            CArg::NotUtf8 => return FfiConfigResult::invalid_utf8("host"),
        };
        let user = match read_arg(user) {
            CArg::Str(user) => user,
            CArg::Null => "",
            CArg::NotUtf8 => return FfiConfigResult::invalid_utf8("user"),
        };
        let pass = match read_arg(pass) {
            CArg::Str(pass) => pass,
            CArg::Null => "",
            CArg::NotUtf8 => return FfiConfigResult::invalid_utf8("pass"),
        };
        match ClientConfig::new(host, port, user, pass, timeout_secs) {
            Ok(config) => FfiConfigResult::ok(config),
            Err(e) => FfiConfigResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiConfigResult::panic("panic in sc_config_new"))
}

/// Create a config from a JSON settings document. Missing fields take
/// their defaults (`http://localhost`, port 9200, 30 second timeout).
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_from_json(json: *const c_char) -> *mut FfiConfigResult {
    catch_unwind(|| {
        let json = match read_arg(json) {
            CArg::Str(json) => json,
            CArg::Null => return FfiConfigResult::null_arg("json"),
            CArg::NotUtf8 => return FfiConfigResult::invalid_utf8("json"),
        };
        let config = ClientSettings::from_json(json).and_then(ClientConfig::try_from);
        match config {
            Ok(config) => FfiConfigResult::ok(config),
            Err(e) => FfiConfigResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiConfigResult::panic("panic in sc_config_from_json"))
}

/// Free a config handle. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_free(config: *mut FfiClientConfig) {
    if !config.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(config) });
        });
    }
}

// ---------------------------------------------------------------------------
// Mutators
// ---------------------------------------------------------------------------

/// Replace the endpoint. On failure the previous endpoint is kept.
///
/// The caller must free the returned status with `sc_free_status`.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_set_host(
    config: *mut FfiClientConfig,
    host: *const c_char,
) -> *mut FfiStatus {
    catch_unwind(move || {
        if config.is_null() {
            return FfiStatus::null_arg("config");
        }
        let host = match read_arg(host) {
            CArg::Str(host) => host,
            CArg::Null => return FfiStatus::null_arg("host"),
            CArg::NotUtf8 => return FfiStatus::invalid_utf8("host"),
        };
        let config = unsafe { &mut *config };
        match config.inner.set_host(host) {
            Ok(()) => FfiStatus::ok(),
            Err(e) => FfiStatus::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiStatus::panic("panic in sc_config_set_host"))
}

/// Overwrite the port. No-op when `config` is null.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_set_port(config: *mut FfiClientConfig, port: u16) {
    if config.is_null() {
        return;
    }
    let _ = catch_unwind(move || {
        let config = unsafe { &mut *config };
        config.inner.set_port(port);
    });
}

/// Overwrite the user. A null `user` clears it. No-op when `config` is null
/// or `user` is not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_set_user(config: *mut FfiClientConfig, user: *const c_char) {
    if config.is_null() {
        return;
    }
    let _ = catch_unwind(move || {
        let user = match read_arg(user) {
            CArg::Str(user) => user,
            CArg::Null => "",
            CArg::NotUtf8 => return,
        };
        let config = unsafe { &mut *config };
        config.inner.set_user(user);
    });
}

/// Overwrite the password. A null `pass` clears it. No-op when `config` is
/// null or `pass` is not valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_set_pass(config: *mut FfiClientConfig, pass: *const c_char) {
    if config.is_null() {
        return;
    }
    let _ = catch_unwind(move || {
        let pass = match read_arg(pass) {
            CArg::Str(pass) => pass,
            CArg::Null => "",
            CArg::NotUtf8 => return,
        };
        let config = unsafe { &mut *config };
        config.inner.set_pass(pass);
    });
}

/// Insert or overwrite a header. Ignored if any argument is null or not
/// valid UTF-8.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_set_header(
    config: *mut FfiClientConfig,
    key: *const c_char,
    value: *const c_char,
) {
    if config.is_null() {
        return;
    }
    let _ = catch_unwind(move || {
        if let (Some(key), Some(value)) = (read_str(key), read_str(value)) {
            let config = unsafe { &mut *config };
            config.inner.set_header(key, value);
        }
    });
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

/// Base address as `scheme://host:port`.
///
/// Returns null if `config` is null. Free with `sc_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_http_address(config: *const FfiClientConfig) -> *mut c_char {
    catch_unwind(|| {
        if config.is_null() {
            return std::ptr::null_mut();
        }
        let config = unsafe { &*config };
        to_c_string(config.inner.http_address())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Request timeout in whole seconds, or 0 if `config` is null.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_timeout_secs(config: *const FfiClientConfig) -> u64 {
    if config.is_null() {
        return 0;
    }
    catch_unwind(|| unsafe { &*config }.inner.timeout().as_secs()).unwrap_or(0)
}

/// Build a request for `path` on the configured endpoint.
///
/// `body` may be null (no body). Returns null if `config` or `path` is null,
/// or if `path` or `body` is not valid UTF-8.
/// Free with `sc_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn sc_config_build_request(
    config: *const FfiClientConfig,
    method: FfiHttpMethod,
    path: *const c_char,
    body: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if config.is_null() {
            return std::ptr::null_mut();
        }
        let Some(path) = read_str(path) else {
            return std::ptr::null_mut();
        };
        let config = unsafe { &*config };
        let body = match read_arg(body) {
            CArg::Str(body) => Some(body.to_string()),
            CArg::Null => None,
            CArg::NotUtf8 => return std::ptr::null_mut(),
        };
        let req = config.inner.build_request(method.into(), path, body);
        FfiHttpRequest::from_core(req)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiConfigResult`. Does not free `config`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sc_free_result(result: *mut FfiConfigResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
    });
}

/// Free an `FfiStatus`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sc_free_status(status: *mut FfiStatus) {
    if status.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let status = unsafe { Box::from_raw(status) };
        if !status.error_message.is_null() {
            drop(unsafe { CString::from_raw(status.error_message) });
        }
    });
}

/// Free an `FfiHttpRequest` returned by `sc_config_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sc_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sc_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
