//! Wire constants and decoding limits.

/// Magic bytes of a gzip stream (Official format).
pub const MAGIC_GZIP: &[u8; 2] = &[0x1F, 0x8B];

/// Magic bytes of the Binary-V1 format.
pub const MAGIC_BINARY_V1: &[u8; 4] = &[0x15, 0xF1, 0x51, 0x53];

/// Magic bytes of the Binary-V2 format.
pub const MAGIC_BINARY_V2: &[u8; 4] = &[0x49, 0x43, 0x42, 0x1F];

/// Maximum bytes in a LEB128 varint (64-bit value).
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum decompressed size of any payload (64 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// Maximum byte length of a Binary-V1 string (single length byte).
pub const MAX_STRING_LEN: usize = 255;

/// Largest element id that fits the symmetric pair key (24 bits).
pub const MAX_PAIR_ID: usize = (1 << 24) - 1;

/// Maximum element count of a Binary-V1 graph (every id fits the pair key).
pub const MAX_BINARY_ELEMENTS: usize = MAX_PAIR_ID + 1;

/// Recipe counts at or above this value spill into an overflow varint.
pub const RECIPE_COUNT_OVERFLOW: usize = 127;

/// Discovery bit of the Binary-V1 flag/count byte.
pub const FLAG_DISCOVERED: u8 = 0x80;

/// Text of the sentinel element that every decoder discards.
pub const NOTHING: &str = "Nothing";

/// Placeholder glyph for elements without a known emoji.
pub const DEFAULT_EMOJI: &str = "⬜";

/// Version string written by the Official encoder.
pub const OFFICIAL_VERSION: &str = "1.0";
