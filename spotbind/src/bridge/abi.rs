//! C ABI exports, the surface a scripting host loads with its FFI module.
//!
//! All functions are `extern "C"` and `#[no_mangle]`.
//! Bindings are opaque `u64` IDs into a `DashMap`; the host opens and closes
//! them explicitly.

use std::collections::HashMap;
use std::ffi::{c_char, CStr, CString};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::binding::Binding;
use crate::bridge::envelope::{InvokeRequest, ResponseEnvelope};
use crate::bridge::BridgeResult;
use crate::config::LibraryConfig;
use crate::dispatch::NativeDispatch;
use crate::error::ErrorKind;
use crate::loader::NativeLibrary;
use crate::operation::Operation;
use crate::status;

/// Open bindings. Maps handle IDs → Arc<Binding>.
static HANDLES: Lazy<DashMap<u64, Arc<Binding>>> = Lazy::new(DashMap::new);

/// Monotonic handle counter.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// NUL-terminated status symbols handed out by pointer; they live for the
/// whole process.
static SYMBOLS: Lazy<HashMap<i32, CString>> = Lazy::new(|| {
    ErrorKind::ALL
        .iter()
        .filter_map(|k| CString::new(k.symbol()).ok().map(|c| (k.value(), c)))
        .collect()
});

/// Helper: read a C string pointer into a Rust String, returning None on null or invalid UTF-8.
unsafe fn read_c_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok().map(String::from)
}

pub(crate) fn register(binding: Binding) -> u64 {
    let id = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    HANDLES.insert(id, Arc::new(binding));
    id
}

fn into_c_string(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

// ─── Status codes ────────────────────────────────────────────────────

/// Symbol for a status value, or null when `code` is not a known status.
///
/// The returned pointer is static; do not free it.
#[unsafe(no_mangle)]
pub extern "C" fn spotbind_status_symbol(code: i32) -> *const c_char {
    match status::from_value(code).and_then(|k| SYMBOLS.get(&k.value())) {
        Some(c) => c.as_ptr(),
        None => std::ptr::null(),
    }
}

/// Value for a status symbol, or -1 for null, invalid UTF-8 or unknown symbols.
///
/// # Safety
///
/// `symbol` must be a valid, NUL-terminated C string, or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spotbind_status_value(symbol: *const c_char) -> i32 {
    let Some(symbol) = (unsafe { read_c_str(symbol) }) else {
        return -1;
    };
    ErrorKind::from_symbol(&symbol).map_or(-1, ErrorKind::value)
}

/// Classify a raw status value.
///
/// Returns true and stores the static symbol pointer in `out_symbol` (when
/// non-null) if `code` is a known status; returns false otherwise and leaves
/// `out_symbol` untouched.
///
/// # Safety
///
/// `out_symbol` must be null or valid for a pointer-sized write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spotbind_disambiguate(code: i32, out_symbol: *mut *const c_char) -> bool {
    let ptr = spotbind_status_symbol(code);
    if ptr.is_null() {
        return false;
    }
    if !out_symbol.is_null() {
        unsafe { *out_symbol = ptr };
    }
    true
}

// ─── Open / Close ────────────────────────────────────────────────────

/// Load the native library and open a binding on it.
///
/// Config JSON schema (every field optional; null config means defaults):
/// ```json
/// {
///   "library_path": "/opt/libspotify/lib/libspotify.so",
///   "extra_search_paths": ["/usr/local/lib/libspotify.so"]
/// }
/// ```
/// Without `library_path`, `LIBSPOTIFY_BIN` is honoured.
///
/// Returns a non-zero handle on success, or 0 on failure.
///
/// # Safety
///
/// `config_json` must be a valid, NUL-terminated UTF-8 C string, or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spotbind_open(config_json: *const c_char) -> u64 {
    let config = if config_json.is_null() {
        LibraryConfig::default()
    } else {
        let Some(json_str) = (unsafe { read_c_str(config_json) }) else {
            tracing::error!("spotbind_open: config_json is not valid UTF-8");
            return 0;
        };
        match serde_json::from_str::<LibraryConfig>(&json_str) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("spotbind_open: invalid JSON: {e}");
                return 0;
            }
        }
    };
    let config = if config.library_path.is_none() {
        config.with_env()
    } else {
        config
    };

    match NativeLibrary::open(&config) {
        Ok(lib) => {
            let dispatch: Box<dyn NativeDispatch> = Box::new(lib);
            let id = register(Binding::init(dispatch));
            tracing::debug!("spotbind_open: opened handle {id}");
            id
        }
        Err(e) => {
            tracing::error!("spotbind_open: {e}");
            0
        }
    }
}

/// Close a binding. Returns `InvalidHandle` when `handle` is not open.
#[unsafe(no_mangle)]
pub extern "C" fn spotbind_close(handle: u64) -> i32 {
    let Some((_, binding)) = HANDLES.remove(&handle) else {
        return BridgeResult::InvalidHandle as i32;
    };
    tracing::debug!("spotbind_close: closing handle {handle}");
    // A call still in flight on another thread keeps its own Arc; the
    // binding ends when that call returns.
    if let Ok(binding) = Arc::try_unwrap(binding) {
        binding.shutdown();
    }
    BridgeResult::Ok as i32
}

// ─── Invoke ──────────────────────────────────────────────────────────

/// Invoke an operation described by a JSON request.
///
/// Request: `{"op": "<name>", "args": [{"type": "...", "value": ...}, ...]}`.
/// With `checked`, a non-ok status is reported as a failure in the envelope
/// (`result` null, `status` and `error` set). Without it the raw result is
/// returned and `status` only classifies it.
///
/// Returns a JSON envelope the caller must free with `spotbind_free_string`,
/// or null when the handle is unknown or the request cannot be parsed.
///
/// # Safety
///
/// `request_json` must be a valid, NUL-terminated UTF-8 C string, or null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spotbind_invoke_json(
    handle: u64,
    request_json: *const c_char,
    checked: bool,
) -> *mut c_char {
    let Some(binding) = HANDLES.get(&handle).map(|b| Arc::clone(&b)) else {
        return std::ptr::null_mut();
    };
    let Some(json_str) = (unsafe { read_c_str(request_json) }) else {
        return std::ptr::null_mut();
    };
    let request: InvokeRequest = match serde_json::from_str(&json_str) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("spotbind_invoke_json: invalid request: {e}");
            return std::ptr::null_mut();
        }
    };

    let outcome = Operation::lookup(&request.op)
        .map_err(Into::into)
        .and_then(|op| {
            if checked {
                binding.invoke_checked(op, &request.args)
            } else {
                binding.invoke(op, &request.args)
            }
        });
    let envelope = ResponseEnvelope::new(request.op, outcome);
    match serde_json::to_string(&envelope) {
        Ok(json) => into_c_string(json),
        Err(e) => {
            tracing::error!("spotbind_invoke_json: serialize failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Native message for a status code, written to `out_message`.
///
/// Returns `InvalidArgument` when `out_message` is null or `code` is not a
/// known status, `InvalidHandle` for an unknown handle, and `Internal` when
/// the native call fails. On `Ok` the caller frees `*out_message` with
/// `spotbind_free_string`.
///
/// # Safety
///
/// `out_message` must be null or valid for a pointer-sized write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spotbind_error_message(
    handle: u64,
    code: i32,
    out_message: *mut *mut c_char,
) -> i32 {
    if out_message.is_null() {
        return BridgeResult::InvalidArgument as i32;
    }
    let Some(kind) = status::from_value(code) else {
        return BridgeResult::InvalidArgument as i32;
    };
    let Some(binding) = HANDLES.get(&handle).map(|b| Arc::clone(&b)) else {
        return BridgeResult::InvalidHandle as i32;
    };
    let message = match binding.error_message(kind) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("spotbind_error_message: {e}");
            return BridgeResult::Internal as i32;
        }
    };
    let ptr = into_c_string(message);
    if ptr.is_null() {
        return BridgeResult::Internal as i32;
    }
    unsafe { *out_message = ptr };
    BridgeResult::Ok as i32
}

/// Free a string previously returned by `spotbind_invoke_json` or
/// `spotbind_error_message`.
///
/// # Safety
///
/// `ptr` must be null or a pointer previously returned by one of those.
/// Must not be called more than once for the same pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn spotbind_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
