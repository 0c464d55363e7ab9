//! Compression framing: gzip for the Official format, raw deflate for Binary-V1.
//!
//! Both directions drive the flate2 stream to completion; callers only see
//! whole buffers.

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, GzDecoder};
use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;

use crate::error::{DecodeError, EncodeError};
use crate::limits::MAX_PAYLOAD_SIZE;

/// Compression level used when the caller does not pick one.
pub const DEFAULT_LEVEL: u32 = 6;

/// Drains `decoder`, failing once more than `max` bytes come out.
///
/// Reads at most `max + 1` bytes, so a compression bomb costs no more than
/// the limit. The reported `len` is therefore a lower bound.
fn read_limited<R: Read>(
    decoder: R,
    input_len: usize,
    field: &'static str,
    max: usize,
) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(input_len.saturating_mul(4).min(max));
    decoder
        .take(max as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;
    if out.len() > max {
        return Err(DecodeError::LengthExceedsLimit {
            field,
            len: out.len(),
            max,
        });
    }
    Ok(out)
}

/// Decompresses a complete gzip stream of at most [`MAX_PAYLOAD_SIZE`] bytes.
pub fn gunzip(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    read_limited(GzDecoder::new(input), input.len(), "gzip_payload", MAX_PAYLOAD_SIZE)
}

/// Compresses a buffer into a gzip stream.
pub fn gzip(input: &[u8], level: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(input.len() / 2), Compression::new(level));
    encoder
        .write_all(input)
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))
}

/// Decompresses a complete raw deflate stream (no zlib wrapper).
pub fn inflate(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    read_limited(DeflateDecoder::new(input), input.len(), "deflate_payload", MAX_PAYLOAD_SIZE)
}

/// Compresses a buffer into a raw deflate stream (no zlib wrapper).
pub fn deflate(input: &[u8], level: u32) -> Result<Vec<u8>, EncodeError> {
    let mut encoder =
        DeflateEncoder::new(Vec::with_capacity(input.len() / 2), Compression::new(level));
    encoder
        .write_all(input)
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EncodeError::CompressionFailed(e.to_string()))
}
