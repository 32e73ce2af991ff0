//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding wire bytes.
///
/// Encoding is infallible; every variant here describes malformed input.
/// A decode failure is always distinguishable from a valid-but-empty
/// message, which decodes to the type's default value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A varint ran past its maximum width of 10 bytes.
    #[error("varint exceeds 10 bytes")]
    VarintOverflow,

    /// A field key carried a field number outside the valid range.
    #[error("invalid field number {field}")]
    InvalidFieldNumber {
        /// The offending field number.
        field: u64,
    },

    /// A field key carried a wire type this codec does not understand,
    /// or a known field arrived with the wrong wire type.
    #[error("invalid wire type {wire_type} for field {field}")]
    InvalidWireType {
        /// The field the key belonged to.
        field: u32,
        /// The wire type found in the key.
        wire_type: u8,
    },

    /// A length-delimited field claimed more bytes than remain.
    #[error("declared length {len} exceeds remaining input ({remaining} bytes)")]
    LengthOverflow {
        /// The declared payload length.
        len: u64,
        /// Bytes actually remaining in the input.
        remaining: usize,
    },

    /// A string field held invalid UTF-8.
    #[error("invalid UTF-8 in string field {field}")]
    InvalidUtf8 {
        /// The field holding the invalid bytes.
        field: u32,
    },
}
