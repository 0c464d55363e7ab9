//! Primitive encoding/decoding for the binary save format.
//!
//! Implements LEB128 varints and single-byte length-prefixed strings.

use crate::error::DecodeError;
use crate::limits::{MAX_STRING_LEN, MAX_VARINT_BYTES};

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEof { context })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an unsigned varint (LEB128).
    #[inline]
    pub fn read_varint(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        let mut result: u64 = 0;
        let mut shift = 0;

        for _ in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte(context)?;
            let value = (byte & 0x7F) as u64;

            if shift == 63 && value > 1 {
                return Err(DecodeError::VarintOverflow);
            }

            result |= value << shift;

            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }

        Err(DecodeError::VarintTooLong)
    }

    /// Reads a varint that is used as a count or index.
    #[inline]
    pub fn read_usize(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        let value = self.read_varint(field)?;
        usize::try_from(value).map_err(|_| DecodeError::ValueTooLarge { field, value })
    }

    /// Reads a string prefixed by a single length byte.
    #[inline]
    pub fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.read_byte(field)? as usize;
        let bytes = self.read_bytes(len, field)?;
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned varint (LEB128).
    #[inline]
    pub fn write_varint(&mut self, mut value: u64) {
        let mut buf = [0u8; MAX_VARINT_BYTES];
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if value == 0 {
                break;
            }
        }
        self.buf.extend_from_slice(&buf[..len]);
    }

    /// Writes a string prefixed by a single length byte.
    ///
    /// Text longer than 255 bytes is cut at the last char boundary that fits.
    pub fn write_string(&mut self, s: &str) {
        let bytes = truncate_str(s, MAX_STRING_LEN).as_bytes();
        self.buf.push(bytes.len() as u8);
        self.buf.extend_from_slice(bytes);
    }
}

/// Returns the longest prefix of `s` that is at most `max` bytes and ends on
/// a char boundary.
pub fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_roundtrip() {
        let test_values = [0u64, 1, 126, 127, 128, 255, 256, 16383, 16384, u64::MAX];

        for v in test_values {
            let mut writer = Writer::new();
            writer.write_varint(v);

            let mut reader = Reader::new(writer.as_bytes());
            let decoded = reader.read_varint("test").unwrap();
            assert_eq!(v, decoded, "failed for {}", v);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_varint_bytes() {
        let mut writer = Writer::new();
        writer.write_varint(300);
        assert_eq!(writer.as_bytes(), &[0xAC, 0x02]);

        let mut writer = Writer::new();
        writer.write_varint(127);
        assert_eq!(writer.as_bytes(), &[0x7F]);
    }

    #[test]
    fn test_varint_too_long() {
        let data = [0x80u8; 11];
        let mut reader = Reader::new(&data);
        let result = reader.read_varint("test");
        assert!(matches!(result, Err(DecodeError::VarintTooLong)));
    }

    #[test]
    fn test_varint_overflow() {
        let mut data = [0xFFu8; 10];
        data[9] = 0x02;
        let mut reader = Reader::new(&data);
        assert!(matches!(reader.read_varint("test"), Err(DecodeError::VarintOverflow)));
    }

    #[test]
    fn test_varint_truncated() {
        let data = [0x80u8, 0x80];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.read_varint("count"),
            Err(DecodeError::UnexpectedEof { context: "count" })
        ));
    }

    #[test]
    fn test_string_roundtrip() {
        let test_strings = ["", "Water", "Steam Engine", "unicode: \u{1F525}"];

        for s in test_strings {
            let mut writer = Writer::new();
            writer.write_string(s);
            assert_eq!(writer.as_bytes()[0] as usize, s.len());

            let mut reader = Reader::new(writer.as_bytes());
            let decoded = reader.read_string("test").unwrap();
            assert_eq!(s, decoded);
        }
    }

    #[test]
    fn test_string_truncated_to_255_bytes() {
        let long = "a".repeat(300);
        let mut writer = Writer::new();
        writer.write_string(&long);
        assert_eq!(writer.len(), 256);

        let mut reader = Reader::new(writer.as_bytes());
        assert_eq!(reader.read_string("text").unwrap(), "a".repeat(255));
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 254 ASCII bytes followed by a 4-byte emoji: the emoji must not be split.
        let s = format!("{}\u{1F525}", "a".repeat(254));
        assert_eq!(truncate_str(&s, 255), "a".repeat(254));
        assert_eq!(truncate_str("short", 255), "short");
    }

    #[test]
    fn test_string_invalid_utf8() {
        let data = [2u8, 0xC3, 0x28];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            reader.read_string("text"),
            Err(DecodeError::InvalidUtf8 { field: "text" })
        ));
    }

    #[test]
    fn test_unexpected_eof() {
        let data = [0u8; 5];
        let mut reader = Reader::new(&data);
        let result = reader.read_bytes(10, "test");
        assert!(matches!(result, Err(DecodeError::UnexpectedEof { .. })));
        assert_eq!(reader.position(), 0);
    }
}
