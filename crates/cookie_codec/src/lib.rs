//! # Cookie Codec
//!
//! Tag-based binary wire codec for cookie records.
//!
//! The format is a protobuf-compatible tag/value stream: each field is
//! prefixed with a varint key `(field_number << 3) | wire_type`, strings are
//! length-delimited UTF-8, and bools and timestamps are varints. Field
//! numbers are fixed forever; schema evolution adds new numbers, and the
//! decoder skips numbers it does not know.
//!
//! ## Usage
//!
//! ```
//! use cookie_codec::{Cookie, Decode, Encode};
//!
//! let cookie = Cookie {
//!     name: "sid".to_string(),
//!     domain: "example.com".to_string(),
//!     secure: true,
//!     ..Cookie::default()
//! };
//!
//! let bytes = cookie.encode();
//! let decoded = Cookie::decode(&bytes).unwrap();
//! assert_eq!(cookie, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cookie;
mod decoder;
mod encoder;
mod error;

pub use cookie::{Cookie, CookieJar};
pub use decoder::{decode_cookie, decode_jar, WireDecoder};
pub use encoder::{encode_cookie, encode_jar, WireEncoder};
pub use error::{CodecError, CodecResult};

/// Trait for types that can be encoded to wire bytes.
pub trait Encode {
    /// Encode this value to wire bytes. Encoding never fails.
    fn encode(&self) -> Vec<u8>;
}

/// Trait for types that can be decoded from wire bytes.
pub trait Decode: Sized {
    /// Decode this value from wire bytes.
    fn decode(bytes: &[u8]) -> CodecResult<Self>;
}

impl Encode for Cookie {
    fn encode(&self) -> Vec<u8> {
        encode_cookie(self)
    }
}

impl Decode for Cookie {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        decode_cookie(bytes)
    }
}

impl Encode for CookieJar {
    fn encode(&self) -> Vec<u8> {
        encode_jar(self)
    }
}

impl Decode for CookieJar {
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        decode_jar(bytes)
    }
}
