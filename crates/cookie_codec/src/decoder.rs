//! Wire-format decoder.

use crate::cookie::{tag, wire, Cookie, CookieJar};
use crate::error::{CodecError, CodecResult};

/// Decode a cookie from wire bytes.
///
/// Empty input is valid and yields a default cookie; fields absent from the
/// input keep their default values. Unknown field numbers are skipped by
/// wire type so newer writers stay readable.
///
/// # Errors
///
/// Returns an error on truncated input, malformed varints, invalid wire
/// types, lengths past the end of input, or invalid UTF-8 in string fields.
pub fn decode_cookie(bytes: &[u8]) -> CodecResult<Cookie> {
    WireDecoder::new(bytes).decode_cookie()
}

/// Decode a jar from wire bytes.
///
/// Empty input is valid and yields an empty jar.
///
/// # Errors
///
/// Same failure modes as [`decode_cookie`].
pub fn decode_jar(bytes: &[u8]) -> CodecResult<CookieJar> {
    WireDecoder::new(bytes).decode_jar()
}

/// A positional decoder over a borrowed byte slice.
pub struct WireDecoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireDecoder<'a> {
    /// Creates a new decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns true if all bytes have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Decodes cookie fields until the input is exhausted.
    pub fn decode_cookie(&mut self) -> CodecResult<Cookie> {
        let mut cookie = Cookie::default();
        while !self.is_empty() {
            let (field, wire_type) = self.read_key()?;
            match field {
                tag::NAME => {
                    self.expect_wire(field, wire_type, wire::LEN)?;
                    cookie.name = self.read_string(field)?;
                }
                tag::VALUE => {
                    self.expect_wire(field, wire_type, wire::LEN)?;
                    cookie.value = self.read_string(field)?;
                }
                tag::DOMAIN => {
                    self.expect_wire(field, wire_type, wire::LEN)?;
                    cookie.domain = self.read_string(field)?;
                }
                tag::PATH => {
                    self.expect_wire(field, wire_type, wire::LEN)?;
                    cookie.path = self.read_string(field)?;
                }
                tag::SECURE => {
                    self.expect_wire(field, wire_type, wire::VARINT)?;
                    cookie.secure = self.read_varint()? != 0;
                }
                tag::HTTP_ONLY => {
                    self.expect_wire(field, wire_type, wire::VARINT)?;
                    cookie.http_only = self.read_varint()? != 0;
                }
                tag::EXPIRATION_TIME => {
                    self.expect_wire(field, wire_type, wire::VARINT)?;
                    cookie.expiration_time = self.read_varint()? as i64;
                }
                _ => self.skip_field(field, wire_type)?,
            }
        }
        Ok(cookie)
    }

    /// Decodes jar entries until the input is exhausted.
    pub fn decode_jar(&mut self) -> CodecResult<CookieJar> {
        let mut jar = CookieJar::new();
        while !self.is_empty() {
            let (field, wire_type) = self.read_key()?;
            match field {
                tag::JAR_COOKIE => {
                    self.expect_wire(field, wire_type, wire::LEN)?;
                    let len = self.read_len()?;
                    let body = self.read_bytes(len)?;
                    jar.cookies.push(decode_cookie(body)?);
                }
                _ => self.skip_field(field, wire_type)?,
            }
        }
        Ok(jar)
    }

    #[inline]
    fn read_byte(&mut self) -> CodecResult<u8> {
        if self.pos >= self.data.len() {
            return Err(CodecError::UnexpectedEof);
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if self.pos + len > self.data.len() {
            return Err(CodecError::UnexpectedEof);
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_varint(&mut self) -> CodecResult<u64> {
        let mut value = 0u64;
        for shift in (0..64).step_by(7) {
            let byte = self.read_byte()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::VarintOverflow)
    }

    fn read_key(&mut self) -> CodecResult<(u32, u8)> {
        let key = self.read_varint()?;
        let field = key >> 3;
        if field == 0 || field > u64::from(u32::MAX) {
            return Err(CodecError::InvalidFieldNumber { field });
        }
        Ok((field as u32, (key & 0x07) as u8))
    }

    fn read_len(&mut self) -> CodecResult<usize> {
        let len = self.read_varint()?;
        let remaining = self.data.len() - self.pos;
        if len > remaining as u64 {
            return Err(CodecError::LengthOverflow { len, remaining });
        }
        Ok(len as usize)
    }

    fn read_string(&mut self, field: u32) -> CodecResult<String> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8 { field })
    }

    fn expect_wire(&self, field: u32, found: u8, expected: u8) -> CodecResult<()> {
        if found == expected {
            Ok(())
        } else {
            Err(CodecError::InvalidWireType {
                field,
                wire_type: found,
            })
        }
    }

    fn skip_field(&mut self, field: u32, wire_type: u8) -> CodecResult<()> {
        match wire_type {
            wire::VARINT => {
                self.read_varint()?;
            }
            wire::FIXED64 => {
                self.read_bytes(8)?;
            }
            wire::LEN => {
                let len = self.read_len()?;
                self.read_bytes(len)?;
            }
            wire::FIXED32 => {
                self.read_bytes(4)?;
            }
            other => {
                return Err(CodecError::InvalidWireType {
                    field,
                    wire_type: other,
                })
            }
        }
        Ok(())
    }
}
