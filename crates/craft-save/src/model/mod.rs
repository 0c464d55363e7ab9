//! Data model types for save files.
//!
//! This module contains the in-memory graph every codec decodes into:
//! - Identifiers and the symmetric pair key
//! - Elements, recipes and uses
//! - The savefile aggregate with its indices and statistics
//! - The emoji dictionary builder used by the binary encoder

pub mod dictionary;
pub mod element;
pub mod id;
pub mod savefile;

pub use dictionary::EmojiDictionary;
pub use element::{Element, Recipe, Use};
pub use id::{checked_pair_key, pair_key, split_pair_key, ElementId, PairKey};
pub use savefile::{SaveOptions, Savefile, Stats};
