//! Elements and the recipe relationships between them.

use crate::model::id::{pair_key, ElementId, PairKey};

/// An unordered ingredient pair producing the element that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipe {
    /// Ingredient with the smaller id.
    ///
    /// `Savefile::add_recipe` normalizes pairs, so the caller's argument
    /// order is not kept and every format writes this ingredient first.
    pub a: ElementId,
    /// Ingredient with the larger (or equal) id.
    pub b: ElementId,
}

impl Recipe {
    /// Creates a recipe pair.
    pub fn new(a: ElementId, b: ElementId) -> Self {
        Self { a, b }
    }

    /// Returns the symmetric key of this pair.
    pub fn key(&self) -> PairKey {
        pair_key(self.a, self.b)
    }

    /// Returns the ingredients ordered `(min, max)`.
    pub fn ordered(&self) -> (ElementId, ElementId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// A back-reference from an ingredient to a recipe it takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Use {
    /// The other ingredient of the recipe.
    pub other: ElementId,
    /// The element the recipe produces.
    pub result: ElementId,
}

/// A named, emoji-tagged node in the combination graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Position in the owning savefile.
    pub id: ElementId,
    /// Display text, unique within a savefile.
    pub text: String,
    /// Emoji glyph.
    pub emoji: String,
    /// Whether the player was the first to discover this element.
    pub discovered: bool,
    /// Ingredient pairs that produce this element.
    pub recipes: Vec<Recipe>,
    /// Recipes this element is an ingredient of, in the order they were added.
    ///
    /// No format stores use lists; decoders rebuild them while adding recipes
    /// result by result in id order. A decoded graph therefore lists uses
    /// grouped by ascending `result`, whatever order the original was built in.
    pub uses: Vec<Use>,
}

impl Element {
    pub(crate) fn new(id: ElementId, text: String, emoji: String, discovered: bool) -> Self {
        Self {
            id,
            text,
            emoji,
            discovered,
            recipes: Vec::new(),
            uses: Vec::new(),
        }
    }

    /// Returns true if this element already has the unordered pair `{a, b}`.
    pub fn has_recipe(&self, a: ElementId, b: ElementId) -> bool {
        let pair = Recipe::new(a, b).ordered();
        self.recipes.iter().any(|r| r.ordered() == pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_key_symmetric() {
        assert_eq!(Recipe::new(4, 9).key(), Recipe::new(9, 4).key());
        assert_eq!(Recipe::new(9, 4).ordered(), (4, 9));
    }

    #[test]
    fn test_has_recipe() {
        let mut steam = Element::new(2, "Steam".into(), "💨".into(), false);
        steam.recipes.push(Recipe::new(1, 0));
        assert!(steam.has_recipe(0, 1));
        assert!(steam.has_recipe(1, 0));
        assert!(!steam.has_recipe(0, 0));
    }

    #[test]
    fn test_has_recipe_large_ids() {
        let mut result = Element::new(0, "Result".into(), "⬜".into(), false);
        result.recipes.push(Recipe::new(0, (1 << 24) + 1));
        assert!(!result.has_recipe(1 << 24, (1 << 24) + 1));
        assert!(result.has_recipe((1 << 24) + 1, 0));
    }
}
