//! Binary-V1 format: LEB128 packing under raw deflate.
//!
//! ```text
//! magic        15 F1 51 53                     (optional when embedded)
//! deflate(
//!   varint     element_count
//!   element[element_count]:
//!     u8 len + utf8   text                      (at most 255 bytes)
//!     varint          emoji index               (into the trailing dictionary)
//!     u8              flags                     (bit 7: discovered, bits 0-6: recipe count)
//!     varint          recipe count - 127        (only when bits 0-6 == 127)
//!     recipe[count]:
//!       varint        a                         (smaller ingredient id)
//!       varint        b - a
//!   varint     emoji_count
//!   (u8 len + utf8)[emoji_count]               (most frequent first)
//! )
//! ```
//!
//! Ingredient ids are stream positions. A `Nothing` entry keeps its position
//! but is not materialized, so recipes pointing at it are dropped.

use tracing::{debug, trace};

use crate::codec::compress::{deflate, inflate, DEFAULT_LEVEL};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::Format;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    FLAG_DISCOVERED, MAGIC_BINARY_V1, MAX_BINARY_ELEMENTS, NOTHING, RECIPE_COUNT_OVERFLOW,
};
use crate::model::{ElementId, EmojiDictionary, SaveOptions, Savefile};

// =============================================================================
// DECODING
// =============================================================================

/// An element as read from the stream, before its emoji index is resolved.
#[derive(Debug)]
struct PendingElement {
    text: String,
    emoji: usize,
    discovered: bool,
    recipes: Vec<(usize, usize)>,
}

impl PendingElement {
    fn read(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let text = reader.read_string("text")?;
        let emoji = reader.read_usize("emoji_index")?;

        let flags = reader.read_byte("flags")?;
        let discovered = flags & FLAG_DISCOVERED != 0;
        let mut count = (flags & !FLAG_DISCOVERED) as usize;
        if count >= RECIPE_COUNT_OVERFLOW {
            let extra = reader.read_varint("recipe_count")?;
            count = usize::try_from(extra)
                .ok()
                .and_then(|extra| extra.checked_add(RECIPE_COUNT_OVERFLOW))
                .ok_or(DecodeError::ValueTooLarge {
                    field: "recipe_count",
                    value: extra,
                })?;
        }

        // Each recipe takes at least two bytes.
        let mut recipes = Vec::with_capacity(count.min(reader.remaining_len() / 2));
        for _ in 0..count {
            let a = reader.read_usize("recipe_a")?;
            let delta = reader.read_usize("recipe_b")?;
            recipes.push((a, a.saturating_add(delta)));
        }

        Ok(Self {
            text,
            emoji,
            discovered,
            recipes,
        })
    }
}

/// Decodes a Binary-V1 savefile including its magic header.
pub fn decode_binary_v1(input: &[u8], options: SaveOptions) -> Result<Savefile, DecodeError> {
    match input.strip_prefix(MAGIC_BINARY_V1.as_slice()) {
        Some(body) => decode_binary_v1_body(body, options),
        None => Err(DecodeError::InvalidMagic {
            expected: *MAGIC_BINARY_V1,
            found: input[..input.len().min(4)].to_vec(),
        }),
    }
}

/// Decodes a headerless Binary-V1 body (the deflate stream alone).
pub fn decode_binary_v1_body(compressed: &[u8], options: SaveOptions) -> Result<Savefile, DecodeError> {
    let payload = inflate(compressed)?;
    let mut save = decode_payload(&payload, options)?;
    save.set_format(Format::BinaryV1);
    debug!(stats = %save.stats(), "decoded binaryV1 savefile");
    Ok(save)
}

/// Decodes the uncompressed payload.
fn decode_payload(payload: &[u8], options: SaveOptions) -> Result<Savefile, DecodeError> {
    let mut reader = Reader::new(payload);

    // Pass 1: buffer elements; their emoji indices point past them.
    let count = reader.read_usize("element_count")?;
    if count > MAX_BINARY_ELEMENTS {
        return Err(DecodeError::LengthExceedsLimit {
            field: "element_count",
            len: count,
            max: MAX_BINARY_ELEMENTS,
        });
    }
    let mut pending = Vec::with_capacity(count.min(reader.remaining_len()));
    for _ in 0..count {
        pending.push(PendingElement::read(&mut reader)?);
    }
    let dictionary = EmojiDictionary::read(&mut reader)?;
    if !reader.is_empty() {
        trace!(trailing = reader.remaining_len(), "ignoring trailing payload bytes");
    }

    // Pass 2: materialize elements, then recipes by stream position.
    let mut save = Savefile::with_options(options);
    let slots: Vec<Option<ElementId>> = pending
        .iter()
        .map(|p| {
            (p.text != NOTHING)
                .then(|| save.add_element(&p.text, dictionary.resolve(p.emoji), p.discovered))
        })
        .collect();

    for (slot, element) in pending.iter().enumerate() {
        let Some(result) = slots[slot] else {
            continue;
        };
        for &(a, b) in &element.recipes {
            let resolve = |pos: usize| slots.get(pos).copied().flatten();
            match (resolve(a), resolve(b)) {
                (Some(a), Some(b)) => {
                    save.add_recipe(a, b, result);
                }
                _ => trace!(result = %element.text, a = a, b = b, "skipping unresolved recipe"),
            }
        }
    }

    save.reconcile_element_count();
    Ok(save)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Options for Binary-V1 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOptions {
    /// Prefix the output with the 4-byte magic header.
    ///
    /// Disable when the body is embedded in a container that already
    /// identifies the format.
    pub header: bool,
    /// Deflate compression level (0-9).
    pub level: u32,
}

impl Default for BinaryOptions {
    fn default() -> Self {
        Self {
            header: true,
            level: DEFAULT_LEVEL,
        }
    }
}

impl BinaryOptions {
    /// Creates default options (header on, level 6).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for a headerless body.
    pub fn headerless() -> Self {
        Self {
            header: false,
            ..Self::default()
        }
    }

    /// Sets the deflate compression level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }
}

/// Stream positions double as ingredient ids, so every id must fit the
/// 24-bit pair key.
fn check_element_count(len: usize) -> Result<(), EncodeError> {
    if len > MAX_BINARY_ELEMENTS {
        return Err(EncodeError::IdOutOfRange {
            id: MAX_BINARY_ELEMENTS,
        });
    }
    Ok(())
}

/// Builds the uncompressed payload.
fn encode_payload(save: &Savefile) -> Vec<u8> {
    let mut dictionary = EmojiDictionary::with_capacity(save.len() / 4 + 1);
    for element in save.elements() {
        dictionary.add(&element.emoji);
    }
    let dictionary = dictionary.into_ranked();

    let mut writer = Writer::with_capacity(save.len() * 16 + save.stats().recipes * 4);
    writer.write_varint(save.len() as u64);

    for element in save.elements() {
        writer.write_string(&element.text);
        // Every element's emoji was added above.
        writer.write_varint(dictionary.index_of(&element.emoji).unwrap_or(0) as u64);

        let count = element.recipes.len();
        let mut flags = count.min(RECIPE_COUNT_OVERFLOW) as u8;
        if element.discovered {
            flags |= FLAG_DISCOVERED;
        }
        writer.write_byte(flags);
        if count >= RECIPE_COUNT_OVERFLOW {
            writer.write_varint((count - RECIPE_COUNT_OVERFLOW) as u64);
        }

        for recipe in &element.recipes {
            let (lo, hi) = recipe.ordered();
            writer.write_varint(lo as u64);
            writer.write_varint((hi - lo) as u64);
        }
    }

    dictionary.write(&mut writer);
    writer.into_bytes()
}

/// Encodes a savefile in Binary-V1 format.
///
/// Output is deterministic: the same graph always yields the same bytes.
pub fn encode_binary_v1(save: &Savefile, options: BinaryOptions) -> Result<Vec<u8>, EncodeError> {
    check_element_count(save.len())?;
    let payload = encode_payload(save);
    let compressed = deflate(&payload, options.level)?;
    if !options.header {
        return Ok(compressed);
    }

    let mut writer = Writer::with_capacity(MAGIC_BINARY_V1.len() + compressed.len());
    writer.write_bytes(MAGIC_BINARY_V1);
    writer.write_bytes(&compressed);
    Ok(writer.into_bytes())
}
