//! In-memory cookie store.

use cookie_codec::{Cookie, CookieJar};
use std::collections::HashMap;
use tracing::debug;

/// Separator between name and domain in the derived map key.
///
/// ASCII unit separator: a control character that cannot appear in a cookie
/// name or a domain, so derived keys never collide.
const KEY_SEPARATOR: char = '\u{1f}';

/// An in-process mapping from `(name, domain)` identity to the current
/// cookie for that identity.
///
/// At most one cookie exists per identity at any time; `set` replaces the
/// stored value, it never mutates in place. Iteration order of query
/// results is arbitrary.
///
/// The store is not synchronized. Sharing one store across threads without
/// external coordination is undefined; callers that need sharing must wrap
/// the store in their own lock.
#[derive(Debug, Default)]
pub struct CookieStore {
    cookies: HashMap<String, Cookie>,
}

impl CookieStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the cookie at its `(name, domain)` identity.
    ///
    /// Idempotent given identical input.
    pub fn set(&mut self, cookie: Cookie) {
        debug!(name = %cookie.name, domain = %cookie.domain, "set cookie");
        let key = Self::key(&cookie.name, &cookie.domain);
        self.cookies.insert(key, cookie);
    }

    /// Deletes the cookie at the given identity.
    ///
    /// An absent identity is a no-op, not an error.
    pub fn remove(&mut self, name: &str, domain: &str) {
        if self.cookies.remove(&Self::key(name, domain)).is_some() {
            debug!(name, domain, "removed cookie");
        }
    }

    /// Returns all cookies whose domain equals the argument, in arbitrary
    /// order. An empty jar is an ordinary query success at this layer.
    pub fn get_by_domain(&self, domain: &str) -> CookieJar {
        self.cookies
            .values()
            .filter(|cookie| cookie.domain == domain)
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// Returns every stored cookie, in arbitrary order.
    pub fn get_all(&self) -> CookieJar {
        self.cookies
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// Empties the store.
    pub fn clear(&mut self) {
        debug!(count = self.cookies.len(), "cleared cookies");
        self.cookies.clear();
    }

    /// Returns the number of stored cookies.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true if the store holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    fn key(name: &str, domain: &str) -> String {
        format!("{name}{KEY_SEPARATOR}{domain}")
    }
}
