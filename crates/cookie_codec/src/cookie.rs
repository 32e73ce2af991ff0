//! Cookie data types and their wire schema.

use serde::{Deserialize, Serialize};

/// Field tags for the wire schema.
///
/// Tags are the stable part of the contract: new fields get new numbers,
/// existing numbers are never reused or renumbered. Decoders skip numbers
/// they do not know.
pub(crate) mod tag {
    /// `Cookie.name`, length-delimited UTF-8.
    pub const NAME: u32 = 1;
    /// `Cookie.value`, length-delimited UTF-8.
    pub const VALUE: u32 = 2;
    /// `Cookie.domain`, length-delimited UTF-8.
    pub const DOMAIN: u32 = 3;
    /// `Cookie.path`, length-delimited UTF-8.
    pub const PATH: u32 = 4;
    /// `Cookie.secure`, varint bool.
    pub const SECURE: u32 = 5;
    /// `Cookie.http_only`, varint bool.
    pub const HTTP_ONLY: u32 = 6;
    /// `Cookie.expiration_time`, varint int64.
    pub const EXPIRATION_TIME: u32 = 7;

    /// `CookieJar.cookies`, repeated length-delimited `Cookie`.
    pub const JAR_COOKIE: u32 = 1;
}

/// Wire types carried in the low three bits of a field key.
pub(crate) mod wire {
    /// Base-128 varint.
    pub const VARINT: u8 = 0;
    /// Fixed 64-bit value (skipped, never produced).
    pub const FIXED64: u8 = 1;
    /// Length-delimited payload.
    pub const LEN: u8 = 2;
    /// Fixed 32-bit value (skipped, never produced).
    pub const FIXED32: u8 = 5;
}

/// One HTTP cookie record.
///
/// Identity is the `(name, domain)` pair; a store holds at most one cookie
/// per identity. The struct is plain data and is never mutated in place:
/// an update stores a replacement value under the same identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive, non-empty within a domain).
    pub name: String,

    /// Raw cookie value.
    pub value: String,

    /// Domain the cookie belongs to; defines the store partition.
    pub domain: String,

    /// Path scoping (e.g. `"/"`).
    pub path: String,

    /// Sent only over HTTPS when set.
    pub secure: bool,

    /// Hidden from client-side scripts when set.
    pub http_only: bool,

    /// Expiration as an epoch timestamp; `0` means a session cookie.
    pub expiration_time: i64,
}

/// An ordered sequence of cookies used as a query-result envelope.
///
/// Order carries no meaning beyond the store's iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    /// The cookies in this jar.
    pub cookies: Vec<Cookie>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cookies in the jar.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true if the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl From<Vec<Cookie>> for CookieJar {
    fn from(cookies: Vec<Cookie>) -> Self {
        Self { cookies }
    }
}
