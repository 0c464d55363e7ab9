//! Official format: gzip-compressed JSON.
//!
//! ```text
//! {
//!   "name": "Save 1", "created": 1735689600000, "updated": 1735689600000,
//!   "version": "1.0", "instances": [],
//!   "items": [{"id": 0, "text": "Water", "emoji": "💧"},
//!             {"id": 2, "text": "Steam", "emoji": "💨", "discovery": true, "recipes": [[0, 1]]}]
//! }
//! ```
//!
//! Recipe pairs reference the declared `id` of other items. Declared ids are
//! only reference keys; decoded elements are renumbered sequentially.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::codec::compress::{gunzip, gzip, DEFAULT_LEVEL};
use crate::codec::Format;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{DEFAULT_EMOJI, NOTHING, OFFICIAL_VERSION};
use crate::model::{ElementId, SaveOptions, Savefile};
use crate::util::datetime::now_millis;

// =============================================================================
// DECODING
// =============================================================================

#[derive(Debug, Deserialize)]
struct OfficialFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    created: Option<i64>,
    #[serde(default)]
    items: Vec<OfficialItem>,
}

#[derive(Debug, Deserialize)]
struct OfficialItem {
    id: i64,
    text: String,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    discovery: bool,
    #[serde(default)]
    recipes: Option<Vec<Value>>,
}

/// Reads a `[a, b]` pair of declared ids; anything else is `None`.
fn declared_pair(pair: &Value) -> Option<(i64, i64)> {
    match pair.as_array()?.as_slice() {
        [a, b] => Some((a.as_i64()?, b.as_i64()?)),
        _ => None,
    }
}

/// Decodes a gzip-compressed Official savefile.
pub fn decode_official(input: &[u8], options: SaveOptions) -> Result<Savefile, DecodeError> {
    let json = gunzip(input)?;
    let mut file: OfficialFile = serde_json::from_slice(&json)?;
    file.items.sort_by_key(|item| item.id);

    let mut save = Savefile::with_options(options);
    if let Some(name) = file.name {
        save.set_name(name);
    }
    if let Some(created) = file.created {
        save.set_created(created);
    }

    // Declared id -> element, only needed while resolving recipes.
    let mut by_declared: FxHashMap<i64, ElementId> =
        FxHashMap::with_capacity_and_hasher(file.items.len(), Default::default());
    for item in &file.items {
        if item.text == NOTHING {
            continue;
        }
        let emoji = item.emoji.as_deref().unwrap_or(DEFAULT_EMOJI);
        let id = save.add_element(&item.text, emoji, item.discovery);
        by_declared.entry(item.id).or_insert(id);
    }

    for item in &file.items {
        let Some(recipes) = item.recipes.as_deref().filter(|r| !r.is_empty()) else {
            continue;
        };
        let Some(&result) = by_declared.get(&item.id) else {
            continue;
        };
        for pair in recipes {
            let resolved = declared_pair(pair)
                .and_then(|(a, b)| by_declared.get(&a).zip(by_declared.get(&b)));
            match resolved {
                Some((&a, &b)) => {
                    save.add_recipe(a, b, result);
                }
                None => trace!(result = %item.text, %pair, "skipping unresolved recipe"),
            }
        }
    }

    save.reconcile_element_count();
    save.set_format(Format::Official);
    debug!(name = %save.name(), stats = %save.stats(), "decoded official savefile");
    Ok(save)
}

// =============================================================================
// ENCODING
// =============================================================================

#[derive(Serialize)]
struct OfficialFileOut<'a> {
    name: &'a str,
    created: i64,
    updated: i64,
    version: &'static str,
    instances: &'a [Value],
    items: Vec<ItemOut<'a>>,
}

#[derive(Serialize)]
struct ItemOut<'a> {
    id: ElementId,
    text: &'a str,
    emoji: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    discovery: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    recipes: Vec<[ElementId; 2]>,
}

/// Encodes a savefile as gzip-compressed Official JSON.
pub fn encode_official(save: &Savefile) -> Result<Vec<u8>, EncodeError> {
    let out = OfficialFileOut {
        name: save.name(),
        created: save.created(),
        updated: now_millis(),
        version: OFFICIAL_VERSION,
        instances: &[],
        items: save
            .elements()
            .iter()
            .map(|e| ItemOut {
                id: e.id,
                text: &e.text,
                emoji: &e.emoji,
                discovery: e.discovered,
                recipes: e.recipes.iter().map(|r| [r.a, r.b]).collect(),
            })
            .collect(),
    };
    let json = serde_json::to_vec(&out)?;
    gzip(&json, DEFAULT_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stats;

    fn gz(json: &str) -> Vec<u8> {
        gzip(json.as_bytes(), DEFAULT_LEVEL).unwrap()
    }

    #[test]
    fn test_decode_sorts_and_renumbers() {
        let json = r#"{
            "name": "Run",
            "created": 1700000000000,
            "items": [
                {"id": 10, "text": "Steam", "emoji": "💨", "discovery": true, "recipes": [[3, 7], [7, 3]]},
                {"id": 7, "text": "Fire", "emoji": "🔥"},
                {"id": 3, "text": "Water", "emoji": "💧"}
            ]
        }"#;
        let save = decode_official(&gz(json), SaveOptions::default()).unwrap();

        let texts: Vec<_> = save.elements().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["Water", "Fire", "Steam"]);
        assert_eq!(save.name(), "Run");
        assert_eq!(save.created(), 1_700_000_000_000);
        assert_eq!(save.format(), Some(Format::Official));
        assert_eq!(
            save.stats(),
            Stats {
                elements: 3,
                discoveries: 1,
                recipes: 1
            }
        );
        let steam = save.element(2).unwrap();
        assert_eq!(steam.recipes.len(), 1);
        assert!(steam.has_recipe(0, 1));
    }

    #[test]
    fn test_decode_skips_nothing_and_dangling() {
        let json = r#"{
            "items": [
                {"id": 0, "text": "Water", "emoji": "💧"},
                {"id": 1, "text": "Nothing", "emoji": "❌"},
                {"id": 2, "text": "Lake", "emoji": "🌊", "recipes": [[0, 1], [0, 99], [0], [0, 0]]}
            ]
        }"#;
        let save = decode_official(&gz(json), SaveOptions::default()).unwrap();

        assert_eq!(save.len(), 2);
        assert!(save.element_by_text("Nothing").is_none());
        let lake = save.element_by_text("Lake").unwrap();
        assert_eq!(lake.id, 1);
        assert_eq!(lake.recipes.len(), 1);
        assert_eq!(save.stats().recipes, 1);
    }

    #[test]
    fn test_decode_skips_malformed_pairs() {
        let json = r#"{
            "items": [
                {"id": 0, "text": "Water", "emoji": "💧"},
                {"id": 1, "text": "Fire", "emoji": "🔥"},
                {"id": 2, "text": "Steam", "emoji": "💨",
                 "recipes": [[0, null], "x", [0, 1.5], [0, 1, 2], [1, 0]]},
                {"id": 3, "text": "Ash", "emoji": "🩶", "recipes": null}
            ]
        }"#;
        let save = decode_official(&gz(json), SaveOptions::default()).unwrap();

        assert_eq!(save.len(), 4);
        let steam = save.element_by_text("Steam").unwrap();
        assert_eq!(steam.recipes.len(), 1);
        assert!(steam.has_recipe(0, 1));
        assert_eq!(save.stats().recipes, 1);
    }

    #[test]
    fn test_decode_not_gzip() {
        let result = decode_official(b"{}", SaveOptions::default());
        assert!(matches!(result, Err(DecodeError::DecompressionFailed(_))));
    }

    #[test]
    fn test_decode_bad_json() {
        let result = decode_official(&gz("{\"items\": 5}"), SaveOptions::default());
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_encode_shape() {
        let mut save = Savefile::new();
        save.set_name("Run");
        save.set_created(42);
        let water = save.add_element("Water", "💧", false);
        let fire = save.add_element("Fire", "🔥", false);
        let steam = save.add_element("Steam", "💨", true);
        save.add_recipe(water, fire, steam);

        let json = gunzip(&encode_official(&save).unwrap()).unwrap();
        let value: Value = serde_json::from_slice(&json).unwrap();

        assert_eq!(value["name"], "Run");
        assert_eq!(value["created"], 42);
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["instances"], serde_json::json!([]));
        assert!(value["updated"].as_i64().unwrap() > 42);
        assert_eq!(value["items"][0], serde_json::json!({"id": 0, "text": "Water", "emoji": "💧"}));
        assert_eq!(
            value["items"][2],
            serde_json::json!({"id": 2, "text": "Steam", "emoji": "💨", "discovery": true, "recipes": [[0, 1]]})
        );
    }

    #[test]
    fn test_roundtrip() {
        let mut save = Savefile::new();
        save.set_name("Roundtrip");
        let water = save.add_element("Water", "💧", false);
        let fire = save.add_element("Fire", "🔥", true);
        let steam = save.add_element("Steam", "💨", false);
        save.add_recipe(fire, water, steam);

        let encoded = encode_official(&save).unwrap();
        let decoded = decode_official(&encoded, SaveOptions::default()).unwrap();

        assert_eq!(decoded.name(), save.name());
        assert_eq!(decoded.created(), save.created());
        assert_eq!(decoded.stats(), save.stats());
        assert_eq!(decoded.elements(), save.elements());
    }
}
