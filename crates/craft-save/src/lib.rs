//! craft-save: multi-format save files for element/recipe combination graphs.
//!
//! A save file records every element a player has crafted, the emoji shown
//! for it, whether the player discovered it first, and the ingredient pairs
//! that produce it. Four on-disk formats exist; all decode into the same
//! in-memory [`Savefile`] graph.
//!
//! # Quick Start
//!
//! ```rust
//! use craft_save::{decode, BinaryOptions, Format, SaveOptions, Savefile};
//!
//! let mut save = Savefile::new();
//! let water = save.add_element("Water", "💧", false);
//! let fire = save.add_element("Fire", "🔥", false);
//! let steam = save.add_element("Steam", "💨", true);
//! save.add_recipe(water, fire, steam);
//!
//! // Encode to the compact binary format
//! let bytes = save.encode_binary_v1(BinaryOptions::default()).unwrap();
//!
//! // Sniff and decode back
//! let decoded = decode(&bytes, SaveOptions::default()).unwrap().unwrap();
//! assert_eq!(decoded.format(), Some(Format::BinaryV1));
//! assert_eq!(decoded.stats(), save.stats());
//! assert_eq!(decoded.recipe_result(fire, water), Some(steam));
//! ```
//!
//! # Modules
//!
//! - [`model`]: The graph (Element, Recipe, Use, Savefile) and the emoji dictionary
//! - [`codec`]: Format sniffing, dispatch and one codec per format
//! - [`validate`]: Structural consistency checks
//! - [`error`]: Error types
//! - [`limits`]: Magic bytes and wire constants
//!
//! # Formats
//!
//! | Format    | Detection                   | Body                            |
//! |-----------|-----------------------------|---------------------------------|
//! | Official  | `1F 8B` gzip magic          | gzip-compressed JSON            |
//! | Legacy    | first byte `{`              | plain JSON                      |
//! | Binary-V2 | `49 43 42 1F`               | recognized, not implemented     |
//! | Binary-V1 | `15 F1 51 53`               | raw deflate of a varint payload |
//!
//! Decoding untrusted input never panics: truncated data, oversized varints
//! and corrupt compression streams are reported as [`DecodeError`]s.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    decode, decode_as, decode_binary_v1, decode_binary_v1_body, decode_binary_v2, decode_legacy,
    decode_official, encode_binary_v1, encode_binary_v2, encode_legacy, encode_official, sniff,
    BinaryOptions, Format,
};
pub use error::{DecodeError, EncodeError, ErrorCode, ValidationError};
pub use model::{
    checked_pair_key, pair_key, split_pair_key, Element, ElementId, EmojiDictionary, PairKey,
    Recipe, SaveOptions, Savefile, Stats, Use,
};
pub use validate::validate_savefile;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
