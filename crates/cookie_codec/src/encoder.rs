//! Wire-format encoder.

use crate::cookie::{tag, wire, Cookie, CookieJar};

/// Encode a cookie to wire bytes.
///
/// Fields holding their default value (empty string, `false`, `0`) are
/// omitted; the decoder restores them, so round-trips are exact.
pub fn encode_cookie(cookie: &Cookie) -> Vec<u8> {
    let mut encoder = WireEncoder::new();
    encoder.encode_cookie(cookie);
    encoder.into_bytes()
}

/// Encode a jar to wire bytes.
///
/// An empty jar encodes to zero bytes.
pub fn encode_jar(jar: &CookieJar) -> Vec<u8> {
    let mut encoder = WireEncoder::new();
    encoder.encode_jar(jar);
    encoder.into_bytes()
}

/// A wire-format encoder over an owned buffer.
pub struct WireEncoder {
    buffer: Vec<u8>,
}

impl WireEncoder {
    /// Creates a new encoder.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates a new encoder with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Consumes this encoder and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Appends a cookie's fields to the buffer.
    pub fn encode_cookie(&mut self, cookie: &Cookie) {
        self.write_string(tag::NAME, &cookie.name);
        self.write_string(tag::VALUE, &cookie.value);
        self.write_string(tag::DOMAIN, &cookie.domain);
        self.write_string(tag::PATH, &cookie.path);
        self.write_bool(tag::SECURE, cookie.secure);
        self.write_bool(tag::HTTP_ONLY, cookie.http_only);
        self.write_int64(tag::EXPIRATION_TIME, cookie.expiration_time);
    }

    /// Appends a jar's cookies to the buffer.
    ///
    /// Each cookie becomes one length-delimited entry under the repeated
    /// field tag, including all-default cookies (which encode to an empty
    /// entry rather than nothing).
    pub fn encode_jar(&mut self, jar: &CookieJar) {
        for cookie in &jar.cookies {
            let body = encode_cookie(cookie);
            self.write_key(tag::JAR_COOKIE, wire::LEN);
            self.write_varint(body.len() as u64);
            self.buffer.extend_from_slice(&body);
        }
    }

    fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    fn write_key(&mut self, field: u32, wire_type: u8) {
        self.write_varint((u64::from(field) << 3) | u64::from(wire_type));
    }

    fn write_string(&mut self, field: u32, value: &str) {
        if value.is_empty() {
            return;
        }
        self.write_key(field, wire::LEN);
        self.write_varint(value.len() as u64);
        self.buffer.extend_from_slice(value.as_bytes());
    }

    fn write_bool(&mut self, field: u32, value: bool) {
        if !value {
            return;
        }
        self.write_key(field, wire::VARINT);
        self.buffer.push(1);
    }

    fn write_int64(&mut self, field: u32, value: i64) {
        if value == 0 {
            return;
        }
        self.write_key(field, wire::VARINT);
        // Two's complement through u64: negatives take the full 10 bytes.
        self.write_varint(value as u64);
    }
}

impl Default for WireEncoder {
    fn default() -> Self {
        Self::new()
    }
}
