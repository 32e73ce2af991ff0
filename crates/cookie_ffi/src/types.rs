//! Type definitions for the boundary.

/// An opaque cookie store handle.
///
/// Returned by `cookie_store_new` and consumed by every other store entry
/// point. Never dereference or inspect; the pointee is private to this
/// library.
///
/// A handle is valid from successful creation until `cookie_store_free`.
/// There is no validity registry: passing a freed or fabricated handle is
/// undefined behavior and the caller's responsibility.
#[repr(C)]
pub struct CookieStoreHandle {
    _private: [u8; 0],
}
