//! # Cookie FFI
//!
//! Stable C ABI for the in-memory cookie store.
//!
//! This crate provides:
//! - C-compatible entry points over [`cookie_core::CookieStore`]
//! - Opaque handle lifecycle (`cookie_store_new` / `cookie_store_free`)
//! - Serialized data exchange via the [`cookie_codec`] wire format
//! - One-directional buffer ownership: the library allocates, the caller
//!   releases via `cookie_free_pointer`
//! - Status-code error reporting; no panic ever unwinds across the ABI
//!
//! The ABI is described for C callers in `include/cookie_store.h`.
//!
//! Stores are not internally synchronized. Calling mutating entry points on
//! one handle from multiple threads without external coordination is
//! undefined; coordinating access is the caller's responsibility.

pub mod buffer;
pub mod status;
pub mod store;
pub mod types;

pub use buffer::cookie_free_pointer;
pub use status::CookieStatus;
pub use types::CookieStoreHandle;
