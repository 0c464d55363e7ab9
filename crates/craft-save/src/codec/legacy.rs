//! Legacy JSON format.
//!
//! ```text
//! {
//!   "elements": [{"text": "Water", "emoji": "💧", "discovered": true}, ...],
//!   "recipes": {"Steam": [[{"text": "Water", "emoji": "💧"}, {"text": "Fire", "emoji": "🔥"}], ...]}
//! }
//! ```
//!
//! Recipes are keyed by result text and reference ingredients by text, so
//! elements that only appear inside `recipes` are created on the fly.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, trace};

use crate::codec::Format;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{DEFAULT_EMOJI, NOTHING};
use crate::model::{Element, SaveOptions, Savefile};

// =============================================================================
// DECODING
// =============================================================================

#[derive(Debug, Deserialize)]
struct LegacyFile {
    #[serde(default)]
    elements: Vec<LegacyElement>,
    #[serde(default)]
    recipes: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct LegacyElement {
    text: String,
    #[serde(default)]
    emoji: Option<String>,
    #[serde(default)]
    discovered: bool,
}

/// Extracts `(text, emoji)` from an ingredient object.
fn ingredient(value: &Value) -> Option<(&str, &str)> {
    let text = value.get("text")?.as_str()?;
    let emoji = value
        .get("emoji")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_EMOJI);
    Some((text, emoji))
}

/// Decodes a legacy JSON savefile.
pub fn decode_legacy(input: &[u8], options: SaveOptions) -> Result<Savefile, DecodeError> {
    let file: LegacyFile = serde_json::from_slice(input)?;
    let mut save = Savefile::with_options(options);

    for element in &file.elements {
        if element.text == NOTHING {
            continue;
        }
        let emoji = element.emoji.as_deref().unwrap_or(DEFAULT_EMOJI);
        save.add_element(&element.text, emoji, element.discovered);
    }

    for (result_text, pairs) in &file.recipes {
        if result_text == NOTHING {
            continue;
        }
        let pairs = match pairs.as_array() {
            Some(pairs) if !pairs.is_empty() => pairs,
            _ => {
                trace!(result = %result_text, "skipping empty or non-array recipe list");
                continue;
            }
        };

        let result = save.add_text(result_text);
        for pair in pairs {
            let Some([a, b]) = pair.as_array().and_then(|p| p.get(0..2)).map(|p| [&p[0], &p[1]])
            else {
                trace!(result = %result_text, "skipping malformed ingredient pair");
                continue;
            };
            let (Some((a_text, a_emoji)), Some((b_text, b_emoji))) = (ingredient(a), ingredient(b))
            else {
                trace!(result = %result_text, "skipping ingredient without text");
                continue;
            };
            if a_text == NOTHING || b_text == NOTHING {
                continue;
            }
            let a = save.add_element(a_text, a_emoji, false);
            let b = save.add_element(b_text, b_emoji, false);
            save.add_recipe(a, b, result);
        }
    }

    save.reconcile_element_count();
    save.set_format(Format::Legacy);
    debug!(stats = %save.stats(), "decoded legacy savefile");
    Ok(save)
}

// =============================================================================
// ENCODING
// =============================================================================

#[derive(Serialize)]
struct LegacyFileOut<'a> {
    elements: Vec<ElementOut<'a>>,
    recipes: RecipesOut<'a>,
}

#[derive(Serialize)]
struct ElementOut<'a> {
    text: &'a str,
    emoji: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    discovered: bool,
}

#[derive(Serialize)]
struct IngredientOut<'a> {
    text: &'a str,
    emoji: &'a str,
}

impl<'a> From<&'a Element> for IngredientOut<'a> {
    fn from(element: &'a Element) -> Self {
        Self {
            text: &element.text,
            emoji: &element.emoji,
        }
    }
}

/// Serializes the result-keyed recipe map without building a JSON tree.
struct RecipesOut<'a>(&'a Savefile);

/// Serializes one result's ingredient pairs.
struct PairsOut<'a>(&'a Savefile, &'a Element);

impl Serialize for RecipesOut<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let with_recipes = self.0.elements().iter().filter(|e| !e.recipes.is_empty());
        let mut map = serializer.serialize_map(None)?;
        for element in with_recipes {
            map.serialize_entry(&element.text, &PairsOut(self.0, element))?;
        }
        map.end()
    }
}

impl Serialize for PairsOut<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let PairsOut(save, result) = *self;
        let mut seq = serializer.serialize_seq(Some(result.recipes.len()))?;
        for recipe in &result.recipes {
            // Recipes only ever reference elements of the same savefile.
            if let (Some(a), Some(b)) = (save.element(recipe.a), save.element(recipe.b)) {
                seq.serialize_element(&[IngredientOut::from(a), IngredientOut::from(b)])?;
            }
        }
        seq.end()
    }
}

/// Encodes a savefile as legacy JSON text.
pub fn encode_legacy(save: &Savefile) -> Result<String, EncodeError> {
    let out = LegacyFileOut {
        elements: save
            .elements()
            .iter()
            .map(|e| ElementOut {
                text: &e.text,
                emoji: &e.emoji,
                discovered: e.discovered,
            })
            .collect(),
        recipes: RecipesOut(save),
    };
    Ok(serde_json::to_string(&out)?)
}
