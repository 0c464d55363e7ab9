//! Emoji dictionary for the binary format.
//!
//! Elements refer to their emoji by index. The encoder ranks entries by how
//! many elements use them so the most common glyphs get the shortest varints.

use rustc_hash::FxHashMap;

use crate::codec::primitives::{Reader, Writer};
use crate::error::DecodeError;
use crate::limits::DEFAULT_EMOJI;

/// Frequency-counting builder and lookup table for emoji glyphs.
///
/// Uses FxHashMap for the glyph → index map.
#[derive(Debug, Clone, Default)]
pub struct EmojiDictionary {
    entries: Vec<String>,
    counts: Vec<usize>,
    indices: FxHashMap<String, usize>,
}

impl EmojiDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dictionary with room for `capacity` distinct glyphs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            counts: Vec::with_capacity(capacity),
            indices: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Builds a dictionary from entries in wire order.
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut indices = FxHashMap::with_capacity_and_hasher(entries.len(), Default::default());
        for (i, entry) in entries.iter().enumerate() {
            indices.entry(entry.clone()).or_insert(i);
        }
        let counts = vec![0; entries.len()];
        Self {
            entries,
            counts,
            indices,
        }
    }

    /// Counts one occurrence of `emoji`, adding it on first sight.
    pub fn add(&mut self, emoji: &str) -> usize {
        if let Some(&idx) = self.indices.get(emoji) {
            self.counts[idx] += 1;
            idx
        } else {
            let idx = self.entries.len();
            self.entries.push(emoji.to_string());
            self.counts.push(1);
            self.indices.insert(emoji.to_string(), idx);
            idx
        }
    }

    /// Reorders entries by descending occurrence count.
    ///
    /// The sort is stable, so equally frequent glyphs keep first-seen order.
    pub fn into_ranked(self) -> Self {
        let mut ranked: Vec<(String, usize)> = self.entries.into_iter().zip(self.counts).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let indices = ranked
            .iter()
            .enumerate()
            .map(|(i, (emoji, _))| (emoji.clone(), i))
            .collect();
        let (entries, counts) = ranked.into_iter().unzip();

        Self {
            entries,
            counts,
            indices,
        }
    }

    /// Returns the number of distinct glyphs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in index order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Gets the index of a glyph.
    pub fn index_of(&self, emoji: &str) -> Option<usize> {
        self.indices.get(emoji).copied()
    }

    /// Gets the glyph at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Gets the glyph at `index`, falling back to the placeholder glyph.
    pub fn resolve(&self, index: usize) -> &str {
        self.get(index).unwrap_or(DEFAULT_EMOJI)
    }

    /// Reads a dictionary: varint count followed by length-prefixed strings.
    pub fn read(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let count = reader.read_usize("emoji_count")?;
        // Every entry takes at least its length byte.
        let mut entries = Vec::with_capacity(count.min(reader.remaining_len()));
        for _ in 0..count {
            entries.push(reader.read_string("emoji")?);
        }
        Ok(Self::from_entries(entries))
    }

    /// Writes the dictionary in wire order.
    pub fn write(&self, writer: &mut Writer) {
        writer.write_varint(self.entries.len() as u64);
        for entry in &self.entries {
            writer.write_string(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_counts_and_indexes() {
        let mut dict = EmojiDictionary::new();
        assert_eq!(dict.add("🔥"), 0);
        assert_eq!(dict.add("💧"), 1);
        assert_eq!(dict.add("🔥"), 0);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_ranked_by_frequency_then_first_seen() {
        let mut dict = EmojiDictionary::new();
        for emoji in ["🌍", "🔥", "💧", "🔥", "💧", "🌬️", "💧"] {
            dict.add(emoji);
        }
        let ranked = dict.into_ranked();
        assert_eq!(ranked.entries(), &["💧", "🔥", "🌍", "🌬️"]);
        assert_eq!(ranked.index_of("💧"), Some(0));
        assert_eq!(ranked.index_of("🌬️"), Some(3));
    }

    #[test]
    fn test_resolve_falls_back_to_placeholder() {
        let dict = EmojiDictionary::from_entries(vec!["🔥".to_string()]);
        assert_eq!(dict.resolve(0), "🔥");
        assert_eq!(dict.resolve(7), DEFAULT_EMOJI);
    }

    #[test]
    fn test_read_write() {
        let mut dict = EmojiDictionary::new();
        dict.add("🔥");
        dict.add("💧");

        let mut writer = Writer::new();
        dict.write(&mut writer);

        let mut reader = Reader::new(writer.as_bytes());
        let decoded = EmojiDictionary::read(&mut reader).unwrap();
        assert_eq!(decoded.entries(), dict.entries());
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_truncated() {
        let data = [3u8, 1, b'a'];
        let mut reader = Reader::new(&data);
        assert!(matches!(
            EmojiDictionary::read(&mut reader),
            Err(DecodeError::UnexpectedEof { context: "emoji" })
        ));
    }
}
