//! Format detection from leading bytes.

use std::fmt;

use crate::limits::{MAGIC_BINARY_V1, MAGIC_BINARY_V2, MAGIC_GZIP};

/// On-disk encodings of a savefile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Gzip-compressed JSON with numeric recipe references.
    Official,
    /// Plain JSON keyed by element text.
    Legacy,
    /// Newer binary format; recognized but not implemented.
    BinaryV2,
    /// LEB128 + raw deflate binary format.
    BinaryV1,
}

impl Format {
    /// All formats in sniffing order.
    pub const ALL: [Format; 4] = [
        Format::Official,
        Format::Legacy,
        Format::BinaryV2,
        Format::BinaryV1,
    ];

    /// Returns the format's tag name.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Official => "official",
            Format::Legacy => "legacy",
            Format::BinaryV2 => "binaryV2",
            Format::BinaryV1 => "binaryV1",
        }
    }

    /// Returns true if a codec exists for this format.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Format::BinaryV2)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies a buffer by its leading bytes.
///
/// Returns `None` for unrecognized data, including buffers too short to carry
/// a magic header.
pub fn sniff(data: &[u8]) -> Option<Format> {
    if data.starts_with(MAGIC_GZIP) {
        Some(Format::Official)
    } else if data.first() == Some(&b'{') {
        Some(Format::Legacy)
    } else if data.starts_with(MAGIC_BINARY_V2) {
        Some(Format::BinaryV2)
    } else if data.starts_with(MAGIC_BINARY_V1) {
        Some(Format::BinaryV1)
    } else {
        None
    }
}
