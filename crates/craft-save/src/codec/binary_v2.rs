//! Binary-V2 format.
//!
//! Only the magic header (`49 43 42 1F`) is known. Both directions refuse to
//! run rather than guess at the payload layout.

use crate::codec::Format;
use crate::error::{DecodeError, EncodeError};
use crate::model::{SaveOptions, Savefile};

/// Always fails with [`DecodeError::Unsupported`].
pub fn decode_binary_v2(_input: &[u8], _options: SaveOptions) -> Result<Savefile, DecodeError> {
    Err(DecodeError::Unsupported {
        format: Format::BinaryV2,
    })
}

/// Always fails with [`EncodeError::Unsupported`].
pub fn encode_binary_v2(_save: &Savefile) -> Result<Vec<u8>, EncodeError> {
    Err(EncodeError::Unsupported {
        format: Format::BinaryV2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::limits::MAGIC_BINARY_V2;

    #[test]
    fn test_decode_fails_loudly() {
        let mut data = MAGIC_BINARY_V2.to_vec();
        data.extend_from_slice(&[0u8; 16]);
        let err = decode_binary_v2(&data, SaveOptions::default()).unwrap_err();
        assert_eq!(err, DecodeError::Unsupported { format: Format::BinaryV2 });
        assert_eq!(err.code(), ErrorCode::UnsupportedFormat);
        assert_eq!(err.to_string(), "binaryV2 decoding is not implemented");
    }

    #[test]
    fn test_encode_fails_loudly() {
        let err = encode_binary_v2(&Savefile::new()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedFormat);
    }
}
