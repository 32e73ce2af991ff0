//! # Cookie Core
//!
//! Pure in-process cookie storage: a flat mapping from `(name, domain)`
//! identity to the current cookie for that identity. No I/O, no boundary
//! awareness, no failure modes beyond programming errors.
//!
//! Query operations return plain (possibly empty) jars; turning "empty"
//! into a not-found status is the boundary layer's job, not this crate's.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod store;

pub use cookie_codec::{Cookie, CookieJar};
pub use store::CookieStore;
