//! The savefile graph: elements, recipes, derived indices and statistics.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::codec::Format;
use crate::limits::DEFAULT_EMOJI;
use crate::model::element::{Element, Recipe, Use};
use crate::model::id::{checked_pair_key, ElementId, PairKey};
use crate::util::datetime::{format_millis_rfc3339, now_millis};

/// Options controlling which derived indices a savefile maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Append `Use` back-references to both ingredients of every recipe.
    pub uses: bool,
    /// Maintain the pair → result reverse lookup.
    pub recipe_map: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            uses: true,
            recipe_map: true,
        }
    }
}

impl SaveOptions {
    /// Creates default options (all indices enabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that keep only the element sequence and recipe lists.
    pub fn minimal() -> Self {
        Self {
            uses: false,
            recipe_map: false,
        }
    }

    /// Sets whether use lists are generated.
    pub fn with_uses(mut self, uses: bool) -> Self {
        self.uses = uses;
        self
    }

    /// Sets whether the reverse recipe map is maintained.
    pub fn with_recipe_map(mut self, recipe_map: bool) -> Self {
        self.recipe_map = recipe_map;
        self
    }
}

/// Running totals kept in step with `add_element` and `add_recipe`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of elements.
    pub elements: usize,
    /// Number of elements flagged as first discoveries.
    pub discoveries: usize,
    /// Number of stored recipe pairs across all results.
    pub recipes: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elements, {} discoveries, {} recipes",
            self.elements, self.discoveries, self.recipes
        )
    }
}

/// A combination graph as stored in a save file.
///
/// Elements are addressed by their position; ids never change once assigned.
/// Recipe dedup uses the 24-bit symmetric pair key, so only the first 2^24
/// elements can act as ingredients. The Binary-V1 codec refuses larger graphs.
#[derive(Debug, Clone)]
pub struct Savefile {
    name: String,
    created: i64,
    elements: Vec<Element>,
    by_text: FxHashMap<String, ElementId>,
    recipe_keys: FxHashSet<(ElementId, PairKey)>,
    recipe_map: FxHashMap<PairKey, ElementId>,
    stats: Stats,
    format: Option<Format>,
    options: SaveOptions,
}

impl Default for Savefile {
    fn default() -> Self {
        Self::new()
    }
}

impl Savefile {
    /// Creates an empty savefile with default options.
    pub fn new() -> Self {
        Self::with_options(SaveOptions::default())
    }

    /// Creates an empty savefile with the given options.
    pub fn with_options(options: SaveOptions) -> Self {
        Self {
            name: String::new(),
            created: now_millis(),
            elements: Vec::new(),
            by_text: FxHashMap::default(),
            recipe_keys: FxHashSet::default(),
            recipe_map: FxHashMap::default(),
            stats: Stats::default(),
            format: None,
            options,
        }
    }

    /// Returns the savefile name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the savefile name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the creation time in milliseconds since the Unix epoch.
    pub fn created(&self) -> i64 {
        self.created
    }

    /// Sets the creation time in milliseconds since the Unix epoch.
    pub fn set_created(&mut self, created: i64) {
        self.created = created;
    }

    /// Returns the format this savefile was decoded from, if any.
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub(crate) fn set_format(&mut self, format: Format) {
        self.format = Some(format);
    }

    /// Returns the options this savefile was created with.
    pub fn options(&self) -> SaveOptions {
        self.options
    }

    /// Returns a snapshot of the running statistics.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Returns all elements in id order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the savefile has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Looks up an element by id.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Looks up an element by its text.
    pub fn element_by_text(&self, text: &str) -> Option<&Element> {
        self.by_text.get(text).map(|&id| &self.elements[id])
    }

    /// Returns the id of the element with the given text.
    pub fn id_of(&self, text: &str) -> Option<ElementId> {
        self.by_text.get(text).copied()
    }

    /// Returns the result recorded for the unordered pair `{a, b}`.
    ///
    /// Always `None` when the reverse map is disabled. When several results
    /// share a pair, the first one added wins.
    pub fn recipe_result(&self, a: ElementId, b: ElementId) -> Option<ElementId> {
        checked_pair_key(a, b).and_then(|key| self.recipe_map.get(&key).copied())
    }

    /// Adds an element, or returns the existing one with the same text.
    ///
    /// `emoji` and `discovered` are ignored when the text already exists.
    pub fn add_element(&mut self, text: &str, emoji: &str, discovered: bool) -> ElementId {
        if let Some(&id) = self.by_text.get(text) {
            return id;
        }
        let id = self.elements.len();
        self.elements
            .push(Element::new(id, text.to_string(), emoji.to_string(), discovered));
        self.by_text.insert(text.to_string(), id);

        self.stats.elements += 1;
        if discovered {
            self.stats.discoveries += 1;
        }
        id
    }

    /// Adds an undiscovered element with the default emoji, or returns the
    /// existing one with the same text.
    pub fn add_text(&mut self, text: &str) -> ElementId {
        self.add_element(text, DEFAULT_EMOJI, false)
    }

    /// Records that `a + b` produces `result`.
    ///
    /// The pair is stored with the smaller id first whatever order the caller
    /// passes, so `add_recipe(fire, water, steam)` with `water < fire` is kept
    /// (and encoded) as `water + fire`.
    ///
    /// Returns false without touching the graph when an id does not name an
    /// element, when an ingredient id exceeds [`MAX_PAIR_ID`], or when
    /// `result` already has the pair in either order.
    ///
    /// [`MAX_PAIR_ID`]: crate::limits::MAX_PAIR_ID
    pub fn add_recipe(&mut self, a: ElementId, b: ElementId, result: ElementId) -> bool {
        let len = self.elements.len();
        if a >= len || b >= len || result >= len {
            trace!(a = a, b = b, result = result, "recipe references a missing element");
            return false;
        }

        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        let Some(key) = checked_pair_key(a, b) else {
            trace!(a = a, b = b, result = result, "ingredient id exceeds the pair key range");
            return false;
        };
        if !self.recipe_keys.insert((result, key)) {
            trace!(a = a, b = b, result = result, "duplicate recipe pair");
            return false;
        }

        self.elements[result].recipes.push(Recipe::new(a, b));
        self.stats.recipes += 1;

        if self.options.recipe_map {
            self.recipe_map.entry(key).or_insert(result);
        }

        if self.options.uses {
            self.elements[a].uses.push(Use { other: b, result });
            if a != b {
                self.elements[b].uses.push(Use { other: a, result });
            }
        }
        true
    }

    /// Empties the savefile and resets stats and the creation time.
    pub fn clear(&mut self) {
        self.created = now_millis();
        self.elements.clear();
        self.by_text.clear();
        self.recipe_keys.clear();
        self.recipe_map.clear();
        self.stats = Stats::default();
        self.format = None;
    }

    #[cfg(test)]
    pub(crate) fn elements_mut(&mut self) -> &mut Vec<Element> {
        &mut self.elements
    }

    /// Overwrites the element count with the authoritative sequence length.
    pub(crate) fn reconcile_element_count(&mut self) {
        self.stats.elements = self.elements.len();
    }

    /// Returns a one-line human readable description.
    pub fn summary(&self) -> String {
        let format = self.format.map(|f| f.name()).unwrap_or("new");
        let name = if self.name.is_empty() { "<unnamed>" } else { &self.name };
        format!(
            "{} [{}] created {}: {}",
            name,
            format,
            format_millis_rfc3339(self.created),
            self.stats
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_elements() -> Savefile {
        let mut save = Savefile::new();
        save.add_element("Water", "💧", false);
        save.add_element("Fire", "🔥", false);
        save.add_element("Wind", "🌬️", false);
        save.add_element("Earth", "🌍", false);
        save
    }

    #[test]
    fn test_base_elements_stats() {
        let save = base_elements();
        assert_eq!(
            save.stats(),
            Stats {
                elements: 4,
                discoveries: 0,
                recipes: 0
            }
        );
        assert_eq!(save.id_of("Earth"), Some(3));
    }

    #[test]
    fn test_add_element_idempotent() {
        let mut save = base_elements();
        let first = save.add_element("Steam", "💨", true);
        let second = save.add_element("Steam", "☁️", false);
        assert_eq!(first, second);
        assert_eq!(save.len(), 5);
        assert_eq!(save.element(first).unwrap().emoji, "💨");
        assert!(save.element(first).unwrap().discovered);
        assert_eq!(save.stats().discoveries, 1);
    }

    #[test]
    fn test_add_text_uses_default_emoji() {
        let mut save = Savefile::new();
        let id = save.add_text("Lava");
        assert_eq!(save.element(id).unwrap().emoji, DEFAULT_EMOJI);
        assert!(!save.element(id).unwrap().discovered);
    }

    #[test]
    fn test_recipe_symmetric_dedup() {
        let mut save = base_elements();
        let water = save.id_of("Water").unwrap();
        let fire = save.id_of("Fire").unwrap();
        let steam = save.add_text("Steam");

        assert!(save.add_recipe(fire, water, steam));
        assert!(!save.add_recipe(fire, water, steam));
        assert!(!save.add_recipe(water, fire, steam));

        assert_eq!(save.element(steam).unwrap().recipes.len(), 1);
        assert_eq!(save.stats().recipes, 1);
    }

    #[test]
    fn test_recipe_stored_smaller_id_first() {
        let mut save = base_elements();
        let water = save.id_of("Water").unwrap();
        let fire = save.id_of("Fire").unwrap();
        let steam = save.add_text("Steam");

        save.add_recipe(fire, water, steam);
        assert_eq!(save.element(steam).unwrap().recipes, vec![Recipe { a: water, b: fire }]);
    }

    #[test]
    fn test_recipe_missing_element_is_noop() {
        let mut save = base_elements();
        assert!(!save.add_recipe(0, 99, 1));
        assert!(!save.add_recipe(0, 1, 42));
        assert_eq!(save.stats().recipes, 0);
    }

    #[test]
    fn test_recipe_uses_and_reverse_map() {
        let mut save = base_elements();
        let steam = save.add_text("Steam");
        save.add_recipe(0, 1, steam);

        assert_eq!(save.element(0).unwrap().uses, vec![Use { other: 1, result: steam }]);
        assert_eq!(save.element(1).unwrap().uses, vec![Use { other: 0, result: steam }]);
        assert_eq!(save.recipe_result(1, 0), Some(steam));
        assert_eq!(save.recipe_result(2, 3), None);
    }

    #[test]
    fn test_self_combination_single_use() {
        let mut save = base_elements();
        let lake = save.add_text("Lake");
        save.add_recipe(0, 0, lake);
        assert_eq!(save.element(0).unwrap().uses, vec![Use { other: 0, result: lake }]);
    }

    #[test]
    fn test_minimal_options_skip_indices() {
        let mut save = Savefile::with_options(SaveOptions::minimal());
        save.add_text("Water");
        save.add_text("Fire");
        let steam = save.add_text("Steam");
        assert!(save.add_recipe(0, 1, steam));

        assert!(save.element(0).unwrap().uses.is_empty());
        assert_eq!(save.recipe_result(0, 1), None);
        assert_eq!(save.stats().recipes, 1);
    }

    #[test]
    fn test_first_result_wins_in_reverse_map() {
        let mut save = base_elements();
        let steam = save.add_text("Steam");
        let mist = save.add_text("Mist");
        save.add_recipe(0, 1, steam);
        save.add_recipe(1, 0, mist);
        assert_eq!(save.recipe_result(0, 1), Some(steam));
        assert_eq!(save.stats().recipes, 2);
    }

    #[test]
    fn test_clear() {
        let mut save = base_elements();
        save.set_name("Run 1");
        save.set_format(Format::Legacy);
        save.add_recipe(0, 1, 2);
        save.clear();

        assert!(save.is_empty());
        assert_eq!(save.stats(), Stats::default());
        assert_eq!(save.format(), None);
        assert_eq!(save.id_of("Water"), None);
        assert_eq!(save.recipe_result(0, 1), None);
        assert_eq!(save.add_text("Water"), 0);
    }

    #[test]
    fn test_summary_mentions_stats() {
        let mut save = base_elements();
        save.set_name("Run 1");
        save.set_created(0);
        assert_eq!(
            save.summary(),
            "Run 1 [new] created 1970-01-01T00:00:00.000Z: 4 elements, 0 discoveries, 0 recipes"
        );
    }

    #[test]
    fn test_savefile_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Savefile>();
    }
}
