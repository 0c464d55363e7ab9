//! Save-file codecs and format dispatch.
//!
//! Every format decodes into the same [`Savefile`] graph. Decoding sniffs the
//! leading bytes; encoding is always to a format the caller names.

pub mod binary_v1;
pub mod binary_v2;
pub mod compress;
pub mod format;
pub mod legacy;
pub mod official;
pub mod primitives;

use tracing::debug;

pub use binary_v1::{decode_binary_v1, decode_binary_v1_body, encode_binary_v1, BinaryOptions};
pub use binary_v2::{decode_binary_v2, encode_binary_v2};
pub use format::{sniff, Format};
pub use legacy::{decode_legacy, encode_legacy};
pub use official::{decode_official, encode_official};
pub use primitives::{Reader, Writer};

use crate::error::{DecodeError, EncodeError};
use crate::model::{SaveOptions, Savefile};

/// Detects the format of `raw` and decodes it into a fresh savefile.
///
/// Returns `Ok(None)` when the leading bytes match no known format. A
/// recognized format without a codec (Binary-V2) is an error.
pub fn decode(raw: &[u8], options: SaveOptions) -> Result<Option<Savefile>, DecodeError> {
    let Some(format) = sniff(raw) else {
        debug!(len = raw.len(), "unrecognized savefile format");
        return Ok(None);
    };
    debug!(%format, len = raw.len(), "detected savefile format");
    decode_as(raw, format, options).map(Some)
}

/// Decodes `raw` as the given format without sniffing.
pub fn decode_as(raw: &[u8], format: Format, options: SaveOptions) -> Result<Savefile, DecodeError> {
    match format {
        Format::Official => decode_official(raw, options),
        Format::Legacy => decode_legacy(raw, options),
        Format::BinaryV2 => decode_binary_v2(raw, options),
        Format::BinaryV1 => decode_binary_v1(raw, options),
    }
}

impl Savefile {
    /// Encodes this savefile as legacy JSON text.
    pub fn encode_legacy(&self) -> Result<String, EncodeError> {
        encode_legacy(self)
    }

    /// Encodes this savefile as gzip-compressed Official JSON.
    pub fn encode_official(&self) -> Result<Vec<u8>, EncodeError> {
        encode_official(self)
    }

    /// Encodes this savefile in Binary-V1 format.
    pub fn encode_binary_v1(&self, options: BinaryOptions) -> Result<Vec<u8>, EncodeError> {
        encode_binary_v1(self, options)
    }

    /// Encodes this savefile in `format` with default options.
    pub fn encode(&self, format: Format) -> Result<Vec<u8>, EncodeError> {
        match format {
            Format::Official => encode_official(self),
            Format::Legacy => encode_legacy(self).map(String::into_bytes),
            Format::BinaryV2 => encode_binary_v2(self),
            Format::BinaryV1 => encode_binary_v1(self, BinaryOptions::default()),
        }
    }
}
