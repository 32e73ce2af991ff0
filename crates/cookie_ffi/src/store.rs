//! Store entry points.
//!
//! One `extern "C"` function per operation, with primitive-typed
//! signatures. Conventions shared by every entry point:
//!
//! - Out-parameters are nulled/zeroed on entry and written only on the
//!   status that promises them: data buffers on `Success` of the two query
//!   calls, error strings on any non-`Success` status.
//! - No failure crosses the boundary unconverted. Each body runs under
//!   `catch_unwind`; a panic becomes `Exception` plus a message buffer,
//!   because unwinding into a foreign caller is unrecoverable.
//! - Everything written through an out-parameter is released by the caller
//!   via `cookie_free_pointer`, exactly once.

use crate::buffer::{alloc_bytes, alloc_error_string};
use crate::status::CookieStatus;
use crate::types::CookieStoreHandle;
use cookie_codec::{Cookie, Decode, Encode};
use cookie_core::CookieStore;
use std::any::Any;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// Status plus the error text to report alongside it, if any.
type Outcome = (CookieStatus, Option<String>);

/// Creates a new, empty cookie store.
///
/// The returned handle owns the store until passed to `cookie_store_free`.
#[no_mangle]
pub extern "C" fn cookie_store_new() -> *mut CookieStoreHandle {
    match catch_unwind(|| Box::into_raw(Box::new(CookieStore::new()))) {
        Ok(store) => store.cast(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Frees a store created by `cookie_store_new`.
///
/// # Safety
///
/// The handle must come from `cookie_store_new` and must not be used after
/// this call.
#[no_mangle]
pub unsafe extern "C" fn cookie_store_free(store: *mut CookieStoreHandle) {
    if store.is_null() {
        return;
    }
    drop(Box::from_raw(store.cast::<CookieStore>()));
}

/// Inserts or replaces one cookie from its serialized form.
///
/// `cookie_data`/`cookie_len` is an encoded `Cookie` message. Returns
/// `Success`, or `Exception` with an error message on malformed input.
///
/// # Safety
///
/// `store` must be a live handle; `cookie_data` must be valid for
/// `cookie_len` bytes; `err_msg` must be null or a valid out-pointer.
#[no_mangle]
pub unsafe extern "C" fn cookie_store_set(
    store: *mut CookieStoreHandle,
    cookie_data: *const u8,
    cookie_len: c_int,
    err_msg: *mut *mut c_char,
) -> CookieStatus {
    clear_out(err_msg);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let Some(store) = store_mut(store) else {
            return null_handle();
        };
        let bytes = match input_bytes(cookie_data, cookie_len) {
            Ok(bytes) => bytes,
            Err(outcome) => return outcome,
        };
        match Cookie::decode(bytes) {
            Ok(cookie) => {
                store.set(cookie);
                (CookieStatus::Success, None)
            }
            Err(e) => (
                CookieStatus::Exception,
                Some(format!("failed to decode cookie: {e}")),
            ),
        }
    }));
    conclude(result, err_msg)
}

/// Returns all cookies for a domain as an encoded `CookieJar`.
///
/// On `Success`, `*out_data`/`*out_len` hold a serialized jar the caller
/// must release. An empty result is `NotFound` with an error message and
/// no data buffer.
///
/// # Safety
///
/// `store` must be a live handle; `domain` must be null-terminated;
/// `out_data`, `out_len` and `err_msg` must be null or valid out-pointers.
#[no_mangle]
pub unsafe extern "C" fn cookie_store_get_by_domain(
    store: *mut CookieStoreHandle,
    domain: *const c_char,
    out_data: *mut *mut u8,
    out_len: *mut c_int,
    err_msg: *mut *mut c_char,
) -> CookieStatus {
    clear_out(out_data);
    clear_len(out_len);
    clear_out(err_msg);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let Some(store) = store_mut(store) else {
            return null_handle();
        };
        let domain = match input_str(domain, "domain") {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        let jar = store.get_by_domain(domain);
        if jar.is_empty() {
            return (
                CookieStatus::NotFound,
                Some(format!("no cookies found for domain {domain}")),
            );
        }
        write_jar(&jar.encode(), out_data, out_len)
    }));
    conclude(result, err_msg)
}

/// Removes the cookie with the given name and domain.
///
/// Removing an absent cookie is `Success`, not an error.
///
/// # Safety
///
/// `store` must be a live handle; `name` and `domain` must be
/// null-terminated; `err_msg` must be null or a valid out-pointer.
#[no_mangle]
pub unsafe extern "C" fn cookie_store_remove(
    store: *mut CookieStoreHandle,
    name: *const c_char,
    domain: *const c_char,
    err_msg: *mut *mut c_char,
) -> CookieStatus {
    clear_out(err_msg);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let Some(store) = store_mut(store) else {
            return null_handle();
        };
        let name = match input_str(name, "name") {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        let domain = match input_str(domain, "domain") {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        store.remove(name, domain);
        (CookieStatus::Success, None)
    }));
    conclude(result, err_msg)
}

/// Returns every stored cookie as an encoded `CookieJar`.
///
/// Same output contract as `cookie_store_get_by_domain`; an empty store is
/// `NotFound`.
///
/// # Safety
///
/// `store` must be a live handle; `out_data`, `out_len` and `err_msg` must
/// be null or valid out-pointers.
#[no_mangle]
pub unsafe extern "C" fn cookie_store_get_all(
    store: *mut CookieStoreHandle,
    out_data: *mut *mut u8,
    out_len: *mut c_int,
    err_msg: *mut *mut c_char,
) -> CookieStatus {
    clear_out(out_data);
    clear_len(out_len);
    clear_out(err_msg);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let Some(store) = store_mut(store) else {
            return null_handle();
        };
        let jar = store.get_all();
        if jar.is_empty() {
            return (
                CookieStatus::NotFound,
                Some("cookie store is empty".to_string()),
            );
        }
        write_jar(&jar.encode(), out_data, out_len)
    }));
    conclude(result, err_msg)
}

/// Removes every cookie from the store.
///
/// # Safety
///
/// `store` must be a live handle; `err_msg` must be null or a valid
/// out-pointer.
#[no_mangle]
pub unsafe extern "C" fn cookie_store_clear_all(
    store: *mut CookieStoreHandle,
    err_msg: *mut *mut c_char,
) -> CookieStatus {
    clear_out(err_msg);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let Some(store) = store_mut(store) else {
            return null_handle();
        };
        store.clear();
        (CookieStatus::Success, None)
    }));
    conclude(result, err_msg)
}

/// Returns the library version as a static null-terminated string.
///
/// The pointer must not be passed to `cookie_free_pointer`.
#[no_mangle]
pub extern "C" fn cookie_store_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr().cast()
}

unsafe fn store_mut<'a>(handle: *mut CookieStoreHandle) -> Option<&'a mut CookieStore> {
    handle.cast::<CookieStore>().as_mut()
}

fn null_handle() -> Outcome {
    (
        CookieStatus::Exception,
        Some("null store handle".to_string()),
    )
}

unsafe fn input_bytes<'a>(data: *const u8, len: c_int) -> Result<&'a [u8], Outcome> {
    if len < 0 {
        return Err((
            CookieStatus::Exception,
            Some(format!("negative input length {len}")),
        ));
    }
    if data.is_null() {
        if len == 0 {
            return Ok(&[]);
        }
        return Err((
            CookieStatus::Exception,
            Some("null data pointer with non-zero length".to_string()),
        ));
    }
    Ok(std::slice::from_raw_parts(data, len as usize))
}

unsafe fn input_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, Outcome> {
    if ptr.is_null() {
        return Err((
            CookieStatus::Exception,
            Some(format!("null {what} argument")),
        ));
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| {
        (
            CookieStatus::Exception,
            Some(format!("invalid UTF-8 in {what} argument")),
        )
    })
}

/// Moves an encoded jar into a foreign buffer and populates the
/// out-parameters. Only called for non-empty jars.
unsafe fn write_jar(bytes: &[u8], out_data: *mut *mut u8, out_len: *mut c_int) -> Outcome {
    let Ok(len) = c_int::try_from(bytes.len()) else {
        return (
            CookieStatus::Exception,
            Some(format!("encoded jar of {} bytes exceeds c_int", bytes.len())),
        );
    };
    let ptr = alloc_bytes(bytes);
    if ptr.is_null() {
        return (
            CookieStatus::AllocationFailed,
            Some("failed to allocate output buffer".to_string()),
        );
    }
    if !out_data.is_null() {
        *out_data = ptr;
    } else {
        // Caller gave us nowhere to put the buffer; reclaim it.
        crate::buffer::cookie_free_pointer(ptr.cast());
        return (
            CookieStatus::Exception,
            Some("null out_data pointer".to_string()),
        );
    }
    if !out_len.is_null() {
        *out_len = len;
    }
    (CookieStatus::Success, None)
}

unsafe fn clear_out<T>(ptr: *mut *mut T) {
    if !ptr.is_null() {
        *ptr = std::ptr::null_mut();
    }
}

unsafe fn clear_len(ptr: *mut c_int) {
    if !ptr.is_null() {
        *ptr = 0;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Converts a body outcome (or a caught panic) into the returned status and
/// writes the error message buffer, if any.
unsafe fn conclude(
    result: std::thread::Result<Outcome>,
    err_msg: *mut *mut c_char,
) -> CookieStatus {
    let (status, message) = match result {
        Ok(outcome) => outcome,
        Err(payload) => (
            CookieStatus::Exception,
            Some(format!("panic in cookie store: {}", panic_message(&*payload))),
        ),
    };
    if let Some(message) = message {
        warn!(status = ?status, message = %message, "cookie store call failed");
        if !err_msg.is_null() {
            // Best effort: a null here means the message itself could not
            // be allocated.
            *err_msg = alloc_error_string(&message);
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::cookie_free_pointer;
    use cookie_codec::CookieJar;
    use std::ffi::CString;

    fn sample_cookie() -> Cookie {
        Cookie {
            name: "sid".to_string(),
            value: "abc".to_string(),
            domain: "example.com".to_string(),
            path: "/".to_string(),
            secure: true,
            http_only: false,
            expiration_time: 0,
        }
    }

    unsafe fn set_cookie(store: *mut CookieStoreHandle, cookie: &Cookie) {
        let bytes = cookie.encode();
        let mut err: *mut c_char = std::ptr::null_mut();
        let status = cookie_store_set(store, bytes.as_ptr(), bytes.len() as c_int, &mut err);
        assert_eq!(status, CookieStatus::Success);
        assert!(err.is_null());
    }

    unsafe fn read_error(err: *mut c_char) -> String {
        assert!(!err.is_null());
        let message = CStr::from_ptr(err).to_str().unwrap().to_string();
        cookie_free_pointer(err.cast());
        message
    }

    #[test]
    fn set_then_get_by_domain_round_trips() {
        unsafe {
            let store = cookie_store_new();
            assert!(!store.is_null());

            let cookie = sample_cookie();
            set_cookie(store, &cookie);

            let domain = CString::new("example.com").unwrap();
            let mut data: *mut u8 = std::ptr::null_mut();
            let mut len: c_int = 0;
            let mut err: *mut c_char = std::ptr::null_mut();

            let status =
                cookie_store_get_by_domain(store, domain.as_ptr(), &mut data, &mut len, &mut err);
            assert_eq!(status, CookieStatus::Success);
            assert!(err.is_null());
            assert!(!data.is_null());
            assert!(len > 0);

            let bytes = std::slice::from_raw_parts(data, len as usize);
            let jar = CookieJar::decode(bytes).unwrap();
            assert_eq!(jar.cookies, vec![cookie]);

            cookie_free_pointer(data.cast());
            cookie_store_free(store);
        }
    }

    #[test]
    fn get_all_on_empty_store_is_not_found_without_buffer() {
        unsafe {
            let store = cookie_store_new();

            let mut data: *mut u8 = std::ptr::null_mut();
            let mut len: c_int = 7;
            let mut err: *mut c_char = std::ptr::null_mut();

            let status = cookie_store_get_all(store, &mut data, &mut len, &mut err);
            assert_eq!(status, CookieStatus::NotFound);
            assert!(data.is_null());
            assert_eq!(len, 0);
            assert_eq!(read_error(err), "cookie store is empty");

            cookie_store_free(store);
        }
    }

    #[test]
    fn get_by_domain_without_match_is_not_found() {
        unsafe {
            let store = cookie_store_new();
            set_cookie(store, &sample_cookie());

            let domain = CString::new("other.org").unwrap();
            let mut data: *mut u8 = std::ptr::null_mut();
            let mut len: c_int = 0;
            let mut err: *mut c_char = std::ptr::null_mut();

            let status =
                cookie_store_get_by_domain(store, domain.as_ptr(), &mut data, &mut len, &mut err);
            assert_eq!(status, CookieStatus::NotFound);
            assert!(data.is_null());
            assert!(read_error(err).contains("other.org"));

            cookie_store_free(store);
        }
    }

    #[test]
    fn domain_filter_returns_only_matches() {
        unsafe {
            let store = cookie_store_new();
            for (name, domain) in [("a", "a.com"), ("b", "a.com"), ("c", "b.com")] {
                set_cookie(
                    store,
                    &Cookie {
                        name: name.to_string(),
                        domain: domain.to_string(),
                        ..Cookie::default()
                    },
                );
            }

            let domain = CString::new("a.com").unwrap();
            let mut data: *mut u8 = std::ptr::null_mut();
            let mut len: c_int = 0;
            let mut err: *mut c_char = std::ptr::null_mut();

            let status =
                cookie_store_get_by_domain(store, domain.as_ptr(), &mut data, &mut len, &mut err);
            assert_eq!(status, CookieStatus::Success);

            let jar = CookieJar::decode(std::slice::from_raw_parts(data, len as usize)).unwrap();
            assert_eq!(jar.len(), 2);
            assert!(jar.cookies.iter().all(|c| c.domain == "a.com"));

            cookie_free_pointer(data.cast());
            cookie_store_free(store);
        }
    }

    #[test]
    fn set_replaces_cookie_with_same_identity() {
        unsafe {
            let store = cookie_store_new();
            set_cookie(store, &sample_cookie());
            set_cookie(
                store,
                &Cookie {
                    value: "replaced".to_string(),
                    ..sample_cookie()
                },
            );

            let mut data: *mut u8 = std::ptr::null_mut();
            let mut len: c_int = 0;
            let mut err: *mut c_char = std::ptr::null_mut();
            let status = cookie_store_get_all(store, &mut data, &mut len, &mut err);
            assert_eq!(status, CookieStatus::Success);

            let jar = CookieJar::decode(std::slice::from_raw_parts(data, len as usize)).unwrap();
            assert_eq!(jar.len(), 1);
            assert_eq!(jar.cookies[0].value, "replaced");

            cookie_free_pointer(data.cast());
            cookie_store_free(store);
        }
    }

    #[test]
    fn set_with_malformed_bytes_is_exception() {
        unsafe {
            let store = cookie_store_new();

            // field 1, wire type 2, declared length past end of input
            let bad = [0x0au8, 0x05, b'x'];
            let mut err: *mut c_char = std::ptr::null_mut();
            let status = cookie_store_set(store, bad.as_ptr(), bad.len() as c_int, &mut err);
            assert_eq!(status, CookieStatus::Exception);
            assert!(read_error(err).contains("decode"));

            cookie_store_free(store);
        }
    }

    #[test]
    fn remove_absent_cookie_is_success() {
        unsafe {
            let store = cookie_store_new();

            let name = CString::new("x").unwrap();
            let domain = CString::new("y").unwrap();
            let mut err: *mut c_char = std::ptr::null_mut();

            let status = cookie_store_remove(store, name.as_ptr(), domain.as_ptr(), &mut err);
            assert_eq!(status, CookieStatus::Success);
            assert!(err.is_null());

            cookie_store_free(store);
        }
    }

    #[test]
    fn remove_then_domain_query_is_not_found() {
        unsafe {
            let store = cookie_store_new();
            set_cookie(store, &sample_cookie());

            let name = CString::new("sid").unwrap();
            let domain = CString::new("example.com").unwrap();
            let mut err: *mut c_char = std::ptr::null_mut();
            let status = cookie_store_remove(store, name.as_ptr(), domain.as_ptr(), &mut err);
            assert_eq!(status, CookieStatus::Success);

            let mut data: *mut u8 = std::ptr::null_mut();
            let mut len: c_int = 0;
            let status =
                cookie_store_get_by_domain(store, domain.as_ptr(), &mut data, &mut len, &mut err);
            assert_eq!(status, CookieStatus::NotFound);
            assert!(data.is_null());
            read_error(err);

            cookie_store_free(store);
        }
    }

    #[test]
    fn clear_then_get_all_is_not_found() {
        unsafe {
            let store = cookie_store_new();
            set_cookie(store, &sample_cookie());

            let mut err: *mut c_char = std::ptr::null_mut();
            let status = cookie_store_clear_all(store, &mut err);
            assert_eq!(status, CookieStatus::Success);
            assert!(err.is_null());

            let mut data: *mut u8 = std::ptr::null_mut();
            let mut len: c_int = 0;
            let status = cookie_store_get_all(store, &mut data, &mut len, &mut err);
            assert_eq!(status, CookieStatus::NotFound);
            assert!(data.is_null());
            read_error(err);

            cookie_store_free(store);
        }
    }

    #[test]
    fn null_handle_is_exception_not_crash() {
        unsafe {
            let mut err: *mut c_char = std::ptr::null_mut();
            let status = cookie_store_clear_all(std::ptr::null_mut(), &mut err);
            assert_eq!(status, CookieStatus::Exception);
            assert_eq!(read_error(err), "null store handle");
        }
    }

    #[test]
    fn null_out_parameters_are_tolerated() {
        unsafe {
            let store = cookie_store_new();

            // Caller that never looks at error messages.
            let bad = [0xffu8];
            let status = cookie_store_set(store, bad.as_ptr(), 1, std::ptr::null_mut());
            assert_eq!(status, CookieStatus::Exception);

            cookie_store_free(store);
        }
    }

    #[test]
    fn free_null_handle_is_noop() {
        unsafe { cookie_store_free(std::ptr::null_mut()) };
    }

    #[test]
    fn version_is_static_string() {
        let ptr = cookie_store_version();
        assert!(!ptr.is_null());
        let version = unsafe { CStr::from_ptr(ptr) };
        assert_eq!(version.to_str().unwrap(), "0.1.0");
    }
}
