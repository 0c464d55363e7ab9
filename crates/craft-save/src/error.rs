//! Error types for save-file encoding/decoding and validation.

use thiserror::Error;

use crate::codec::Format;
use crate::model::ElementId;

/// Error classes a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The format is recognized but has no codec.
    UnsupportedFormat,
    /// The payload is truncated, corrupt, or not valid for its format.
    MalformedPayload,
    /// The graph violates one of its own invariants.
    Inconsistent,
}

impl ErrorCode {
    /// Returns a short stable name for the code.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedFormat => "unsupported-format",
            ErrorCode::MalformedPayload => "malformed-payload",
            ErrorCode::Inconsistent => "inconsistent",
        }
    }
}

/// Error during decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("{format} decoding is not implemented")]
    Unsupported { format: Format },

    #[error("invalid magic bytes: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic { expected: [u8; 4], found: Vec<u8> },

    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("varint exceeds maximum length (10 bytes)")]
    VarintTooLong,

    #[error("varint overflow (value exceeds u64)")]
    VarintOverflow,

    #[error("{field} value {value} does not fit in memory")]
    ValueTooLarge { field: &'static str, value: u64 },

    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("{field} length {len} exceeds limit {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("malformed JSON: {0}")]
    Json(String),
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::Unsupported { .. } => ErrorCode::UnsupportedFormat,
            _ => ErrorCode::MalformedPayload,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}

/// Error during encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("{format} encoding is not implemented")]
    Unsupported { format: Format },

    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("JSON serialization failed: {0}")]
    Json(String),

    #[error("element id {id} does not fit in 24 bits")]
    IdOutOfRange { id: ElementId },
}

impl EncodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EncodeError::Unsupported { .. } => ErrorCode::UnsupportedFormat,
            EncodeError::IdOutOfRange { .. } => ErrorCode::Inconsistent,
            _ => ErrorCode::MalformedPayload,
        }
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Json(err.to_string())
    }
}

/// Error during graph validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("element at position {position} carries id {id}")]
    IdMismatch { position: usize, id: ElementId },

    #[error("text {text:?} is held by more than one element")]
    DuplicateText { text: String },

    #[error("text index maps {text:?} to {indexed}, expected {actual}")]
    TextIndexMismatch {
        text: String,
        indexed: ElementId,
        actual: ElementId,
    },

    #[error("recipe for {result} references missing element {missing}")]
    DanglingIngredient { result: ElementId, missing: ElementId },

    #[error("element {result} lists the pair ({a}, {b}) more than once")]
    DuplicateRecipe {
        result: ElementId,
        a: ElementId,
        b: ElementId,
    },

    #[error("use list of {element} does not match its recipes")]
    UseMismatch { element: ElementId },

    #[error("stats field {field} is {recorded}, content says {actual}")]
    StatsMismatch {
        field: &'static str,
        recorded: usize,
        actual: usize,
    },
}

impl ValidationError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Inconsistent
    }
}
