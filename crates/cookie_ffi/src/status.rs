//! Status codes returned across the boundary.

use std::os::raw::c_int;

/// Result code for every store entry point.
///
/// The numeric values are part of the C ABI and mirror
/// `include/cookie_store.h`; they must never change.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieStatus {
    /// Something failed inside the library; an error message buffer
    /// explains what. Never accompanied by a data buffer.
    Exception = -1,
    /// Operation succeeded.
    Success = 0,
    /// A query yielded zero results. Accompanied by an error message
    /// buffer but never by a data buffer.
    NotFound = 1,
    /// An output buffer could not be allocated.
    AllocationFailed = 2,
}

impl CookieStatus {
    /// Returns true if the status indicates success.
    pub fn is_success(self) -> bool {
        self == CookieStatus::Success
    }
}

impl From<CookieStatus> for c_int {
    fn from(status: CookieStatus) -> Self {
        status as c_int
    }
}

impl From<c_int> for CookieStatus {
    fn from(code: c_int) -> Self {
        match code {
            0 => CookieStatus::Success,
            1 => CookieStatus::NotFound,
            2 => CookieStatus::AllocationFailed,
            _ => CookieStatus::Exception,
        }
    }
}
